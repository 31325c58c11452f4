//! Engine command definitions.
//!
//! Each variant pairs an engine method name with its parameter payload.
//! `OpenDoc` takes positional params (a JSON array); everything else takes
//! named params (a JSON object). Serialization into the request envelope
//! uses adjacent tagging so the variant name becomes the `method` field and
//! the payload becomes `params`.
//!
//! | Command | Engine method | Params |
//! |---------|---------------|--------|
//! | [`EngineCommand::OpenDoc`] | `OpenDoc` | `["<docId>"]` |
//! | [`EngineCommand::DoReload`] | `DoReload` | `{}` |
//! | [`EngineCommand::DoSave`] | `DoSave` | `{}` |
//! | [`EngineCommand::SelectValues`] | `SelectValues` | `{qField, qValues}` |
//! | [`EngineCommand::GetAllInfos`] | `GetAllInfos` | `{}` |
//! | [`EngineCommand::GetObject`] | `GetObject` | `{qId}` |
//! | [`EngineCommand::GetLayout`] | `GetLayout` | `{}` |
//! | [`EngineCommand::GetChildInfos`] | `GetChildInfos` | `{}` |
//! | [`EngineCommand::Export`] | `Export` | `{qFileType, qPath}` |
//! | [`EngineCommand::ExportImg`] | `ExportImg` | `{qFileType, qPath}` |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// FieldValue
// ============================================================================

/// One field value in a `SelectValues` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Textual value to select.
    #[serde(rename = "qText")]
    pub text: String,
}

impl FieldValue {
    /// Creates a field value from text.
    #[inline]
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self { text: value.into() }
    }
}

// ============================================================================
// EngineCommand
// ============================================================================

/// All engine methods this crate issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum EngineCommand {
    /// Open a document by id or path. Positional params, global handle.
    OpenDoc(Vec<String>),

    /// Reload the open document's data.
    DoReload {},

    /// Save the open document.
    DoSave {},

    /// Select values in a field, replacing the current selection.
    SelectValues {
        /// Field to select in.
        #[serde(rename = "qField")]
        field: String,
        /// Values to select, in order.
        #[serde(rename = "qValues")]
        values: Vec<FieldValue>,
    },

    /// List every object in the document (all types).
    GetAllInfos {},

    /// Resolve an object id to a live handle.
    GetObject {
        /// Object id to resolve.
        #[serde(rename = "qId")]
        id: String,
    },

    /// Fetch the layout of the object behind the target handle.
    GetLayout {},

    /// List the child objects of the object behind the target handle.
    GetChildInfos {},

    /// Export the object behind the target handle.
    Export {
        /// Output file type (`"png"`).
        #[serde(rename = "qFileType")]
        file_type: String,
        /// Server-side path hint, empty for a temp-content url.
        #[serde(rename = "qPath")]
        path: String,
    },

    /// Image-export variant of [`EngineCommand::Export`].
    ///
    /// Some engine versions only honor one of the two methods; which ones
    /// are issued is a configuration choice.
    ExportImg {
        /// Output file type (`"png"`).
        #[serde(rename = "qFileType")]
        file_type: String,
        /// Server-side path hint, empty for a temp-content url.
        #[serde(rename = "qPath")]
        path: String,
    },
}

// ============================================================================
// Constructors
// ============================================================================

impl EngineCommand {
    /// Creates an `OpenDoc` command for the given document id.
    #[inline]
    #[must_use]
    pub fn open_doc(document_id: impl Into<String>) -> Self {
        Self::OpenDoc(vec![document_id.into()])
    }

    /// Creates a `SelectValues` command from plain string values.
    #[must_use]
    pub fn select_values(field: impl Into<String>, values: &[String]) -> Self {
        Self::SelectValues {
            field: field.into(),
            values: values.iter().map(FieldValue::text).collect(),
        }
    }

    /// Creates a `GetObject` command for the given object id.
    #[inline]
    #[must_use]
    pub fn get_object(id: impl Into<String>) -> Self {
        Self::GetObject { id: id.into() }
    }

    /// Creates an `Export` command producing a PNG.
    #[inline]
    #[must_use]
    pub fn export_png() -> Self {
        Self::Export {
            file_type: "png".to_string(),
            path: String::new(),
        }
    }

    /// Creates an `ExportImg` command producing a PNG.
    #[inline]
    #[must_use]
    pub fn export_img_png() -> Self {
        Self::ExportImg {
            file_type: "png".to_string(),
            path: String::new(),
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl EngineCommand {
    /// Returns the engine method name, for logging and error context.
    #[must_use]
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::OpenDoc(_) => "OpenDoc",
            Self::DoReload {} => "DoReload",
            Self::DoSave {} => "DoSave",
            Self::SelectValues { .. } => "SelectValues",
            Self::GetAllInfos {} => "GetAllInfos",
            Self::GetObject { .. } => "GetObject",
            Self::GetLayout {} => "GetLayout",
            Self::GetChildInfos {} => "GetChildInfos",
            Self::Export { .. } => "Export",
            Self::ExportImg { .. } => "ExportImg",
        }
    }

    /// Returns the `outKey` envelope field this command requires.
    ///
    /// Only `OpenDoc` carries one (`-1`).
    #[must_use]
    pub fn out_key(&self) -> Option<i64> {
        match self {
            Self::OpenDoc(_) => Some(-1),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
