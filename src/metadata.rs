use serde::{Deserialize, Serialize};

use crate::draft::AssetDraft;
use crate::error::{Error, Result};

/// The canonical JSON document bound to a token.
///
/// Serialized and uploaded to the storage network as a second content
/// object; its resolved URL becomes the token URI. Never mutated after
/// upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    /// Gateway-resolved URL of the uploaded asset file.
    pub image: String,
}

impl TokenMetadata {
    /// Build the document from a validated draft and the uploaded file's URL.
    pub fn compose(draft: &AssetDraft, image_url: &str) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            image: image_url.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Metadata(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_carries_draft_fields_and_image_url() {
        let draft = AssetDraft::new("Art", "desc", "1.5").with_file(vec![0xaa]);
        let doc = TokenMetadata::compose(&draft, "https://ipfs.infura.io/ipfs/Qm_img");
        assert_eq!(doc.name, "Art");
        assert_eq!(doc.description, "desc");
        assert_eq!(doc.image, "https://ipfs.infura.io/ipfs/Qm_img");
    }

    #[test]
    fn json_shape_matches_the_published_document() {
        let draft = AssetDraft::new("Art", "desc", "1.5").with_file(vec![0xaa]);
        let doc = TokenMetadata::compose(&draft, "u");
        let json = doc.to_json().unwrap();
        assert_eq!(json, r#"{"name":"Art","description":"desc","image":"u"}"#);
    }
}
