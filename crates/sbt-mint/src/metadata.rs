//! Off-chain SBT metadata and the item content cell.

use std::sync::Arc;

use sbt_cell::{Cell, CellBuilder, CellResult};
use serde::{Deserialize, Serialize};

/// Content layout tag for off-chain metadata.
pub const OFFCHAIN_CONTENT_TAG: u8 = 0x01;

/// A link button shown with the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub uri: String,
}

/// A trait/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// The JSON document an SBT's content URI points to.
///
/// Optional fields that are unset and empty lists are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbtMetadata {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl SbtMetadata {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content_url(mut self, url: impl Into<String>) -> Self {
        self.content_url = Some(url.into());
        self
    }

    pub fn add_button(mut self, label: impl Into<String>, uri: impl Into<String>) -> Self {
        self.buttons.push(Button {
            label: label.into(),
            uri: uri.into(),
        });
        self
    }

    pub fn add_attribute(
        mut self,
        trait_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push(Attribute {
            trait_type: trait_type.into(),
            value: value.into(),
        });
        self
    }

    /// Drop empty optionals, and buttons and attributes with an empty field.
    pub fn normalized(&self) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            name: self.name.clone(),
            image: self.image.clone(),
            description: non_empty(&self.description),
            content_url: non_empty(&self.content_url),
            buttons: self
                .buttons
                .iter()
                .filter(|b| !b.label.is_empty() && !b.uri.is_empty())
                .cloned()
                .collect(),
            attributes: self
                .attributes
                .iter()
                .filter(|a| !a.trait_type.is_empty() && !a.value.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Serialize the normalized document to compact JSON.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.normalized())
    }
}

/// Build the item content cell: the off-chain tag followed by the URI as a
/// snake string.
pub fn content_cell(uri: &str) -> CellResult<Arc<Cell>> {
    let mut builder = CellBuilder::new();
    builder.store_u8(OFFCHAIN_CONTENT_TAG)?;
    builder.store_string_tail(uri)?;
    Ok(Arc::new(builder.build()?))
}
