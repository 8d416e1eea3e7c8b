use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// On-screen coordinates of an overlay, in player pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Default for Position {
  fn default() -> Self {
    Self { x: 250.0, y: 150.0 }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
  pub width: f64,
  pub height: f64,
}

impl Default for Size {
  fn default() -> Self {
    Self {
      width: 200.0,
      height: 60.0,
    }
  }
}

/// A positionable annotation shown on top of a livestream.
///
/// `id` and `created_at` are minted by the server at creation and never
/// change afterwards; clients can only touch the remaining fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
  pub id: String,
  pub content: String,
  #[serde(rename = "imageUrl")]
  pub image_url: String,
  /// Open-ended overlay kind ("text", "image", ...); no validated enumeration.
  #[serde(rename = "type")]
  pub kind: String,
  pub position: Position,
  pub size: Size,
  /// Free-form CSS-ish styling bucket, passed through to the player untouched.
  pub style: serde_json::Map<String, serde_json::Value>,
  pub created_at: DateTime<Utc>,
}

/// Creation payload. Every field is optional; missing fields take the
/// documented defaults. Unknown keys (including `id` and `created_at`)
/// are ignored by serde, so clients cannot pick their own identity.
#[derive(Debug, Clone, Deserialize)]
pub struct OverlayDraft {
  #[serde(default)]
  pub content: String,
  #[serde(rename = "imageUrl", default)]
  pub image_url: String,
  #[serde(rename = "type", default = "default_kind")]
  pub kind: String,
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub size: Size,
  #[serde(default)]
  pub style: serde_json::Map<String, serde_json::Value>,
}

fn default_kind() -> String {
  "text".into()
}

impl Default for OverlayDraft {
  fn default() -> Self {
    Self {
      content: String::new(),
      image_url: String::new(),
      kind: default_kind(),
      position: Position::default(),
      size: Size::default(),
      style: serde_json::Map::new(),
    }
  }
}

impl Overlay {
  /// Mint a new overlay from a draft: fresh id, UTC creation timestamp,
  /// defaults already substituted by the draft's deserialization.
  pub fn create(draft: OverlayDraft) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      content: draft.content,
      image_url: draft.image_url,
      kind: draft.kind,
      position: draft.position,
      size: draft.size,
      style: draft.style,
      created_at: Utc::now(),
    }
  }
}

/// Partial update. Only the mutable whitelist {content, type, position,
/// size, style, imageUrl} exists here; any other key in a request body
/// is dropped during deserialization and never reaches the store.
/// Nested values replace the stored ones wholesale (no deep merge).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayPatch {
  pub content: Option<String>,
  #[serde(rename = "imageUrl")]
  pub image_url: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub position: Option<Position>,
  pub size: Option<Size>,
  pub style: Option<serde_json::Map<String, serde_json::Value>>,
}

impl OverlayPatch {
  /// Overwrite the fields present in the patch, leaving the rest alone.
  pub fn apply(&self, overlay: &mut Overlay) {
    if let Some(content) = &self.content {
      overlay.content = content.clone();
    }
    if let Some(image_url) = &self.image_url {
      overlay.image_url = image_url.clone();
    }
    if let Some(kind) = &self.kind {
      overlay.kind = kind.clone();
    }
    if let Some(position) = self.position {
      overlay.position = position;
    }
    if let Some(size) = self.size {
      overlay.size = size;
    }
    if let Some(style) = &self.style {
      overlay.style = style.clone();
    }
  }
}
