use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const OUTPUT_NAME_KEY: &str = "ss_output_name";
pub const TAG_FREQUENCY_KEY: &str = "ss_tag_frequency";

/// Tag occurrence counts of one training subset, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCounts {
    tags: Vec<(String, u64)>,
}

impl TagCounts {
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// The `n` most frequent tags. Equal counts keep their original order.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self
            .tags
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

impl FromIterator<(String, u64)> for TagCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        TagCounts {
            tags: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subset {
    pub name: String,
    pub tags: TagCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelTags {
    pub model: String,
    pub subsets: Vec<Subset>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unreadable(String),
    NoMetadata,
    MissingField(&'static str),
    BadFrequency(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SkipReason::*;
        match self {
            Unreadable(err) => write!(f, "unreadable header: {err}"),
            NoMetadata => write!(f, "no __metadata__ table"),
            MissingField(key) => write!(f, "no {key} in metadata"),
            BadFrequency(err) => write!(f, "malformed {TAG_FREQUENCY_KEY}: {err}"),
        }
    }
}

/// Outcome of looking for tag frequencies in one checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(ModelTags),
    Skipped(SkipReason),
}

impl Extraction {
    pub fn from_metadata(metadata: Option<&HashMap<String, String>>) -> Self {
        let Some(metadata) = metadata else {
            return Extraction::Skipped(SkipReason::NoMetadata);
        };
        let Some(model) = metadata.get(OUTPUT_NAME_KEY) else {
            return Extraction::Skipped(SkipReason::MissingField(OUTPUT_NAME_KEY));
        };
        let Some(frequency) = metadata.get(TAG_FREQUENCY_KEY) else {
            return Extraction::Skipped(SkipReason::MissingField(TAG_FREQUENCY_KEY));
        };
        match parse_tag_frequency(frequency) {
            Ok(subsets) => Extraction::Found(ModelTags {
                model: model.clone(),
                subsets,
            }),
            Err(err) => Extraction::Skipped(SkipReason::BadFrequency(err)),
        }
    }
}

fn parse_count(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// Parses the JSON-encoded `{subset: {tag: count}}` table.
pub fn parse_tag_frequency(text: &str) -> Result<Vec<Subset>, String> {
    let value: Value = json5::from_str(text).map_err(|err| err.to_string())?;
    let Value::Object(subsets) = value else {
        return Err("expected an object of subsets".to_string());
    };
    subsets
        .into_iter()
        .map(|(name, tags)| {
            let Value::Object(tags) = tags else {
                return Err(format!("subset {name:?} is not an object"));
            };
            let tags = tags
                .into_iter()
                .map(|(tag, count)| match parse_count(&count) {
                    Some(count) => Ok((tag, count)),
                    None => Err(format!("count for {tag:?} is not a non-negative integer")),
                })
                .collect::<Result<TagCounts, String>>()?;
            Ok(Subset { name, tags })
        })
        .collect()
}
