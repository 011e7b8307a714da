// Multipart body construction. Parts are collected in order first and only
// turned into a reqwest form at the very end, so call sites never touch the
// transport's encoding.

use crate::models::UploadOptions;
use reqwest::multipart::{Form, Part};

/// Form field carrying the image bytes.
pub const IMAGE_FIELD: &str = "imagedata";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Binary {
        name: String,
        bytes: Vec<u8>,
        filename: String,
        content_type: String,
    },
    Text {
        name: String,
        value: String,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Binary { name, .. } | FormPart::Text { name, .. } => name,
        }
    }
}

/// Ordered list of named parts, binary or text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuilder {
    parts: Vec<FormPart>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The upload body: the image as `imagedata`, then one text part per
    /// option that is set.
    pub fn for_upload(image: Vec<u8>, options: &UploadOptions) -> Self {
        let builder = FormBuilder::new().binary(
            IMAGE_FIELD,
            image,
            options.filename.clone(),
            options.content_type.mime(),
        );
        options
            .text_fields()
            .into_iter()
            .fold(builder, |builder, (name, value)| builder.text(name, value))
    }

    pub fn binary(
        mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.parts.push(FormPart::Binary {
            name: name.into(),
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        });
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Encode into a reqwest form. Byte parts keep their known length.
    /// Fails only if a binary part carries an unparsable MIME type.
    pub fn into_form(self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Binary {
                    name,
                    bytes,
                    filename,
                    content_type,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(filename)
                        .mime_str(&content_type)?;
                    form.part(name, part)
                }
                FormPart::Text { name, value } => form.text(name, value),
            };
        }
        Ok(form)
    }
}
