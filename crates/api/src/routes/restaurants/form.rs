//! Multipart form parsing for restaurant submissions.
//!
//! Text parts become JSON values keyed by field name. Bracketed names build
//! nested structures the way browser form libraries encode them:
//!
//! ```text
//! restaurantName=Cafe X        -> { "restaurantName": "Cafe X" }
//! cuisines[0]=Thai             -> { "cuisines": ["Thai", ...] }
//! cuisines[]=Thai              -> { "cuisines": [..., "Thai"] }
//! menuItems[0][name]=Pad Thai  -> { "menuItems": [{ "name": "Pad Thai" }] }
//! ```
//!
//! Repeating a plain name collects the values into an array.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::UploadedImage;

/// Name of the file part carrying the restaurant image.
pub const IMAGE_FIELD: &str = "imageFile";

/// Largest accepted array index in a bracketed field name.
const MAX_ARRAY_INDEX: usize = 255;

/// Most bracket segments accepted after the base name.
const MAX_PATH_DEPTH: usize = 5;

/// Most values and array slots a single form may create.
const MAX_FORM_SLOTS: usize = 4096;

/// A parsed restaurant submission.
#[derive(Debug, Default)]
pub struct RestaurantForm {
    pub fields: Map<String, Value>,
    pub image: Option<UploadedImage>,
}

impl RestaurantForm {
    /// Read every part of `multipart`.
    ///
    /// An `imageFile` part without a file name is treated as "no file
    /// chosen". File parts under any other name are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PayloadTooLarge`] when the body limit is hit and
    /// [`AppError::InvalidForm`] for any other malformed input.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut root = Value::Object(Map::new());
        let mut budget = SlotBudget::new(MAX_FORM_SLOTS);
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(form_error)? {
            let name = field.name().unwrap_or_default().to_owned();
            let has_file_name = field.file_name().is_some_and(|f| !f.is_empty());

            if name == IMAGE_FIELD {
                if !has_file_name {
                    continue;
                }
                if image.is_some() {
                    return Err(AppError::InvalidForm(format!(
                        "more than one {IMAGE_FIELD} part"
                    )));
                }
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(form_error)?;
                image = Some(UploadedImage {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else if has_file_name {
                return Err(AppError::InvalidForm(format!(
                    "unexpected file part {name:?}"
                )));
            } else if !name.is_empty() {
                let text = field.text().await.map_err(form_error)?;
                insert_field(&mut root, &name, Value::String(text), &mut budget)?;
            }
        }

        let fields = match root {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Self { fields, image })
    }
}

fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidForm(err.body_text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
    Append,
}

/// Remaining number of values and array slots a form may still create.
#[derive(Debug)]
struct SlotBudget(usize);

impl SlotBudget {
    const fn new(slots: usize) -> Self {
        Self(slots)
    }

    fn take(&mut self, slots: usize) -> Result<(), AppError> {
        self.0 = self.0.checked_sub(slots).ok_or_else(|| {
            AppError::InvalidForm(format!("form creates more than {MAX_FORM_SLOTS} values"))
        })?;
        Ok(())
    }
}

/// Split `a[0][b]` into `[Key(a), Index(0), Key(b)]`.
///
/// Names that are not well-formed bracket paths are used verbatim as a key.
/// Well-formed paths nested deeper than [`MAX_PATH_DEPTH`] are rejected.
fn parse_path(name: &str) -> Result<Vec<Segment<'_>>, AppError> {
    let verbatim = || Ok(vec![Segment::Key(name)]);

    let Some(open) = name.find('[') else {
        return verbatim();
    };
    if open == 0 {
        return verbatim();
    }

    let (base, mut rest) = name.split_at(open);
    let mut segments = vec![Segment::Key(base)];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return verbatim();
        };
        let Some((key, tail)) = inner.split_once(']') else {
            return verbatim();
        };
        if segments.len() > MAX_PATH_DEPTH {
            return Err(AppError::InvalidForm(format!(
                "field name nested deeper than {MAX_PATH_DEPTH} levels"
            )));
        }
        segments.push(if key.is_empty() {
            Segment::Append
        } else if let Ok(index) = key.parse::<usize>() {
            Segment::Index(index)
        } else {
            Segment::Key(key)
        });
        rest = tail;
    }
    Ok(segments)
}

/// Insert `value` into `root` at the path described by `name`.
fn insert_field(
    root: &mut Value,
    name: &str,
    value: Value,
    budget: &mut SlotBudget,
) -> Result<(), AppError> {
    insert_at(root, &parse_path(name)?, value, budget)
}

fn insert_at(
    target: &mut Value,
    path: &[Segment<'_>],
    value: Value,
    budget: &mut SlotBudget,
) -> Result<(), AppError> {
    let Some((head, rest)) = path.split_first() else {
        *target = value;
        return Ok(());
    };

    match *head {
        Segment::Key(key) => {
            let map = ensure_object(target);
            if rest.is_empty() {
                budget.take(1)?;
                match map.entry(key) {
                    Entry::Occupied(mut slot) => push_repeated(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
                Ok(())
            } else {
                if !map.contains_key(key) {
                    budget.take(1)?;
                }
                let child = map.entry(key).or_insert_with(|| container_for(rest));
                insert_at(child, rest, value, budget)
            }
        }
        Segment::Index(index) => {
            if index > MAX_ARRAY_INDEX {
                return Err(AppError::InvalidForm(format!(
                    "array index {index} exceeds {MAX_ARRAY_INDEX}"
                )));
            }
            let items = ensure_array(target);
            if items.len() <= index {
                budget.take(index + 1 - items.len())?;
                items.resize(index + 1, Value::Null);
            }
            let Some(slot) = items.get_mut(index) else {
                return Ok(());
            };
            if rest.is_empty() {
                *slot = value;
                Ok(())
            } else {
                if slot.is_null() {
                    *slot = container_for(rest);
                }
                insert_at(slot, rest, value, budget)
            }
        }
        Segment::Append => {
            budget.take(1)?;
            let items = ensure_array(target);
            if rest.is_empty() {
                items.push(value);
                return Ok(());
            }
            items.push(container_for(rest));
            match items.last_mut() {
                Some(slot) => insert_at(slot, rest, value, budget),
                None => Ok(()),
            }
        }
    }
}

/// Empty container matching the first segment of `rest`.
fn container_for(rest: &[Segment<'_>]) -> Value {
    match rest.first() {
        Some(Segment::Key(_)) => Value::Object(Map::new()),
        Some(Segment::Index(_) | Segment::Append) => Value::Array(Vec::new()),
        None => Value::Null,
    }
}

fn ensure_object(target: &mut Value) -> &mut Map<String, Value> {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    match target {
        Value::Object(map) => map,
        _ => unreachable!("target was just replaced with an object"),
    }
}

fn ensure_array(target: &mut Value) -> &mut Vec<Value> {
    if !target.is_array() {
        *target = Value::Array(Vec::new());
    }
    match target {
        Value::Array(items) => items,
        _ => unreachable!("target was just replaced with an array"),
    }
}

/// A plain name seen twice becomes an array of its values.
fn push_repeated(existing: &mut Value, value: Value) {
    match existing {
        Value::Array(items) => items.push(value),
        other => {
            let first = other.take();
            *other = Value::Array(vec![first, value]);
        }
    }
}
