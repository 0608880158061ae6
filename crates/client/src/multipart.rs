//! Hand-built `multipart/form-data` bodies.
//!
//! The backend's parser is sensitive to the exact layout, so the body is
//! assembled byte for byte rather than through a generic form encoder:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<field>"[; filename="<name>"]\r\n
//! [Content-Type: <mime>\r\n]
//! \r\n
//! <value>\r\n
//! ...
//! --<boundary>--\r\n
//! ```

/// MIME type sent for every uploaded photo.
pub const IMAGE_JPEG: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: String,
        data: Vec<u8>,
    },
}

/// An ordered list of form parts sharing one boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Empty form with a random UUID boundary.
    pub fn new() -> Self {
        Self::with_boundary(uuid::Uuid::new_v4().to_string().to_uppercase())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Append a plain string field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Serialize the form into the request body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();

        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match part {
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Form for `POST /api/submissions/`: image, description, username, email.
pub fn submission_form(image: &[u8], description: &str, username: &str, email: &str) -> MultipartForm {
    MultipartForm::new()
        .file("image", "punch.jpg", IMAGE_JPEG, image)
        .text("description", description)
        .text("username", username)
        .text("email", email)
}

/// Form for `PUT /api/profile/`: bio, username, email, then the optional
/// profile image.
pub fn profile_form(bio: &str, username: &str, email: &str, profile_image: Option<&[u8]>) -> MultipartForm {
    let form = MultipartForm::new()
        .text("bio", bio)
        .text("username", username)
        .text("email", email);

    match profile_image {
        Some(image) => form.file("profile_image", "profile.jpg", IMAGE_JPEG, image),
        None => form,
    }
}
