//! Rejection form: mandatory comments plus an optional evidence file
//!
//! Evidence is uploaded before the rejection is recorded so the decision can carry
//! its durable URL. The form refuses to produce a decision while that upload runs.

use bgv_core::StagedFile;

use crate::error::{ReviewError, ReviewResult};
use crate::record::{Decision, ItemKey};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Evidence {
    #[default]
    None,
    Staged(StagedFile),
    Uploading(StagedFile),
    Uploaded { name: String, url: String },
}

#[derive(Debug, Clone)]
pub struct RejectForm {
    key: ItemKey,
    comments: String,
    evidence: Evidence,
}

impl RejectForm {
    pub fn new(key: ItemKey) -> Self {
        Self {
            key,
            comments: String::new(),
            evidence: Evidence::None,
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn with_evidence(mut self, file: StagedFile) -> Self {
        self.evidence = Evidence::Staged(file);
        self
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.comments = comments.into();
    }

    pub fn attach(&mut self, file: StagedFile) -> ReviewResult<()> {
        if matches!(self.evidence, Evidence::Uploading(_)) {
            return Err(ReviewError::UploadInFlight);
        }
        self.evidence = Evidence::Staged(file);
        Ok(())
    }

    pub fn detach(&mut self) -> ReviewResult<()> {
        if matches!(self.evidence, Evidence::Uploading(_)) {
            return Err(ReviewError::UploadInFlight);
        }
        self.evidence = Evidence::None;
        Ok(())
    }

    /// The staged file, moved into the uploading state; `None` when nothing awaits upload
    pub fn begin_upload(&mut self) -> Option<StagedFile> {
        match std::mem::take(&mut self.evidence) {
            Evidence::Staged(file) => {
                self.evidence = Evidence::Uploading(file.clone());
                Some(file)
            }
            other => {
                self.evidence = other;
                None
            }
        }
    }

    pub fn finish_upload(&mut self, url: impl Into<String>) {
        if let Evidence::Uploading(file) = std::mem::take(&mut self.evidence) {
            self.evidence = Evidence::Uploaded {
                name: file.name,
                url: url.into(),
            };
        }
    }

    /// Upload failed; the file goes back to staged so it can be retried
    pub fn fail_upload(&mut self) {
        if let Evidence::Uploading(file) = std::mem::take(&mut self.evidence) {
            self.evidence = Evidence::Staged(file);
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.evidence, Evidence::Uploading(_))
    }

    /// The rejection decision, once comments are present and any evidence is uploaded
    pub fn decision(&self) -> ReviewResult<Decision> {
        let attachment_url = match &self.evidence {
            Evidence::Uploading(_) | Evidence::Staged(_) => return Err(ReviewError::UploadInFlight),
            Evidence::Uploaded { url, .. } => Some(url.clone()),
            Evidence::None => None,
        };
        let comments = self.comments.trim();
        if comments.is_empty() {
            return Err(ReviewError::MissingComments);
        }
        Ok(Decision::Reject {
            comments: comments.to_string(),
            attachment_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bgv_core::Section;

    fn form() -> RejectForm {
        RejectForm::new(ItemKey::new(Section::Banking, "ifscCode"))
    }

    #[test]
    fn test_comments_required() {
        assert_eq!(form().decision(), Err(ReviewError::MissingComments));
        assert_eq!(form().with_comments("  ").decision(), Err(ReviewError::MissingComments));
        assert_eq!(
            form().with_comments(" wrong branch ").decision(),
            Ok(Decision::Reject {
                comments: "wrong branch".into(),
                attachment_url: None
            })
        );
    }

    #[test]
    fn test_evidence_flow() {
        let file = StagedFile::from_bytes("cheque.png", "image/png", vec![1, 2, 3]);
        let mut form = form().with_comments("mismatch").with_evidence(file);
        assert_eq!(form.decision(), Err(ReviewError::UploadInFlight));

        let staged = form.begin_upload().unwrap();
        assert_eq!(staged.name, "cheque.png");
        assert!(form.is_uploading());
        assert_eq!(form.decision(), Err(ReviewError::UploadInFlight));
        assert!(form.detach().is_err());

        form.finish_upload("/blob/ev-9");
        assert_eq!(form.decision().unwrap().attachment_url(), Some("/blob/ev-9"));
        assert!(form.begin_upload().is_none());
    }

    #[test]
    fn test_failed_upload_restages() {
        let file = StagedFile::from_bytes("cheque.png", "image/png", vec![1]);
        let mut form = form().with_comments("x").with_evidence(file);
        form.begin_upload();
        form.fail_upload();
        assert!(matches!(form.evidence(), Evidence::Staged(_)));
    }
}
