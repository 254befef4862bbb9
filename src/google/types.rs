//! Request and response shapes for the Drive v3 and Sheets v4 APIs.
//!
//! Response structs are lenient: every field the API may omit is optional or
//! defaulted, since the remote shape is not under our control.

use serde::{Deserialize, Serialize};

/// How the Sheets API should interpret written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ValueInputOption {
    Raw,
    #[default]
    UserEntered,
    InputValueOptionUnspecified,
}

impl ValueInputOption {
    pub const ALL: [Self; 3] = [Self::Raw, Self::UserEntered, Self::InputValueOptionUnspecified];

    pub const NAMES: &'static [&'static str] =
        &[Self::ALL[0].as_str(), Self::ALL[1].as_str(), Self::ALL[2].as_str()];

    /// Wire name; the only place these strings are spelled out.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
            Self::InputValueOptionUnspecified => "INPUT_VALUE_OPTION_UNSPECIFIED",
        }
    }
}

/// How appended rows are placed relative to existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum InsertDataOption {
    Overwrite,
    #[default]
    InsertRows,
}

impl InsertDataOption {
    pub const ALL: [Self; 2] = [Self::Overwrite, Self::InsertRows];

    pub const NAMES: &'static [&'static str] = &[Self::ALL[0].as_str(), Self::ALL[1].as_str()];

    /// Wire name; the only place these strings are spelled out.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "OVERWRITE",
            Self::InsertRows => "INSERT_ROWS",
        }
    }
}

/// Serde goes through `as_str` so the wire names and `NAMES` share one source.
macro_rules! wire_names {
    ($ty:ident) => {
        impl From<$ty> for &'static str {
            fn from(option: $ty) -> Self {
                option.as_str()
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(name: String) -> Result<Self, Self::Error> {
                Self::ALL
                    .into_iter()
                    .find(|option| option.as_str() == name)
                    .ok_or_else(|| {
                        format!("unknown variant `{}`, expected one of {}", name, Self::NAMES.join(", "))
                    })
            }
        }
    };
}

wire_names!(ValueInputOption);
wire_names!(InsertDataOption);

/// A Drive full-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSearch {
    /// Complete Drive query expression (`q` parameter).
    pub query: String,
    pub page_token: Option<String>,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Downloaded or exported file body.
#[derive(Debug, Clone, PartialEq)]
pub enum FileBody {
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileContents {
    pub name: String,
    /// Mime type of `body`; for exported Workspace files this is the export type.
    pub mime_type: String,
    pub body: FileBody,
}

/// Overwrite of a single range with a block of values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueUpdate {
    pub spreadsheet_id: String,
    pub range: String,
    pub value_input_option: ValueInputOption,
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u64>,
    #[serde(default)]
    pub updated_columns: Option<u64>,
    #[serde(default)]
    pub updated_cells: Option<u64>,
}

/// Read of one or more ranges.
///
/// With `ranges` set the read is a `values:batchGet`; otherwise the whole
/// spreadsheet grid is fetched and optionally narrowed to `sheet_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRead {
    pub spreadsheet_id: String,
    pub ranges: Option<Vec<String>>,
    pub sheet_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchGetValuesResponse {
    #[serde(default)]
    pub value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Sheet {
    #[serde(default)]
    pub properties: Option<SheetProperties>,
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    #[serde(default)]
    pub sheet_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GridData {
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CellData {
    #[serde(default)]
    pub formatted_value: Option<String>,
}

impl Spreadsheet {
    /// Flatten grid data into one value range per sheet.
    ///
    /// Sheets are kept in document order; with `sheet_id` set only the
    /// matching sheet survives. Empty cells become empty strings.
    pub fn into_value_ranges(self, sheet_id: Option<i64>) -> Vec<ValueRange> {
        self.sheets
            .into_iter()
            .filter(|sheet| match sheet_id {
                Some(wanted) => sheet.properties.as_ref().and_then(|p| p.sheet_id) == Some(wanted),
                None => true,
            })
            .map(|sheet| {
                let title = sheet.properties.and_then(|p| p.title);
                let values = sheet
                    .data
                    .into_iter()
                    .flat_map(|grid| grid.row_data)
                    .map(|row| {
                        row.values
                            .into_iter()
                            .map(|cell| serde_json::Value::String(cell.formatted_value.unwrap_or_default()))
                            .collect()
                    })
                    .collect();

                ValueRange {
                    range: title,
                    major_dimension: Some("ROWS".to_string()),
                    values,
                }
            })
            .collect()
    }
}

/// Append of rows after the table found in `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAppend {
    pub spreadsheet_id: String,
    pub range: String,
    pub value_input_option: ValueInputOption,
    pub insert_data_option: InsertDataOption,
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub table_range: Option<String>,
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeValues {
    pub range: String,
    pub values: Vec<Vec<String>>,
}

/// Several range overwrites submitted as one request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchValueUpdate {
    pub spreadsheet_id: String,
    pub value_input_option: ValueInputOption,
    pub include_values_in_response: bool,
    pub data: Vec<RangeValues>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub total_updated_rows: Option<u64>,
    #[serde(default)]
    pub total_updated_columns: Option<u64>,
    #[serde(default)]
    pub total_updated_cells: Option<u64>,
    #[serde(default)]
    pub total_updated_sheets: Option<u64>,
    #[serde(default)]
    pub responses: Vec<UpdateValuesResponse>,
}
