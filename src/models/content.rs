/// Content received from the platform share mechanism, one instance per
/// share event.
#[derive(Debug, Clone)]
pub enum ShareContent {
    Text {
        text: String,
        title: Option<String>,
        subject: Option<String>,
    },
    Image {
        bytes: Vec<u8>,
        file_name: String,
        mime_type: String,
        text: Option<String>,
        title: Option<String>,
        subject: Option<String>,
    },
}

impl ShareContent {
    pub fn text(text: impl Into<String>) -> Self {
        ShareContent::Text {
            text: text.into(),
            title: None,
            subject: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ShareContent::Text { .. } => "text",
            ShareContent::Image { .. } => "image",
        }
    }
}
