use crate::model::{Extraction, ModelTags, Subset};
use regex::Regex;
use serde_json::{Map, Value};
use std::io::{self, Write};

pub struct ReportOptions {
    pub top: usize,
    pub subset_filter: Option<Regex>,
}

impl ReportOptions {
    fn subsets<'a>(&'a self, tags: &'a ModelTags) -> impl Iterator<Item = &'a Subset> + 'a {
        tags.subsets.iter().filter(|subset| match &self.subset_filter {
            Some(r) => r.is_match(&subset.name),
            None => true,
        })
    }
}

pub fn write_text(
    out: &mut impl Write,
    file_name: &str,
    extraction: &Extraction,
    options: &ReportOptions,
) -> io::Result<()> {
    writeln!(out, "# {file_name}")?;
    let Extraction::Found(tags) = extraction else {
        return Ok(());
    };
    writeln!(out, "[{}]", tags.model)?;
    for subset in options.subsets(tags) {
        writeln!(out, "    [{}.{}]", tags.model, subset.name)?;
        for (tag, count) in subset.tags.top(options.top) {
            writeln!(out, "    {tag} = {count}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

/// `{ "model": .., "subsets": { subset: { tag: count } } }` for one checkpoint.
pub fn to_json(tags: &ModelTags, options: &ReportOptions) -> Value {
    let mut subsets = Map::new();
    for subset in options.subsets(tags) {
        let top: Map<String, Value> = subset
            .tags
            .top(options.top)
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count.into()))
            .collect();
        subsets.insert(subset.name.clone(), top.into());
    }
    let mut map = Map::new();
    map.insert("model".to_string(), tags.model.clone().into());
    map.insert("subsets".to_string(), subsets.into());
    map.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SkipReason, parse_tag_frequency};

    fn model() -> Extraction {
        Extraction::Found(ModelTags {
            model: "style".to_string(),
            subsets: parse_tag_frequency(
                r#"{"10_img": {"x":5,"y":9,"z":1,"w":7,"v":3,"u":8}, "2_reg": {"solo": 1}}"#,
            )
            .unwrap(),
        })
    }

    fn render(extraction: &Extraction, options: &ReportOptions) -> String {
        let mut out = Vec::new();
        write_text(&mut out, "style.safetensors", extraction, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_report_layout() {
        let options = ReportOptions {
            top: 5,
            subset_filter: None,
        };
        let expected = "\
# style.safetensors
[style]
    [style.10_img]
    y = 9
    u = 8
    w = 7
    x = 5
    v = 3
    [style.2_reg]
    solo = 1

";
        assert_eq!(render(&model(), &options), expected);
    }

    #[test]
    fn skipped_file_prints_only_its_name() {
        let options = ReportOptions {
            top: 5,
            subset_filter: None,
        };
        let skipped = Extraction::Skipped(SkipReason::NoMetadata);
        assert_eq!(render(&skipped, &options), "# style.safetensors\n");
    }

    #[test]
    fn subset_filter_and_top_limit() {
        let options = ReportOptions {
            top: 2,
            subset_filter: Some(Regex::new("img").unwrap()),
        };
        let text = render(&model(), &options);
        assert!(text.contains("[style.10_img]\n    y = 9\n    u = 8\n\n"));
        assert!(!text.contains("2_reg"));
    }

    #[test]
    fn json_report_keeps_ranking_order() {
        let options = ReportOptions {
            top: 3,
            subset_filter: None,
        };
        let Extraction::Found(tags) = model() else {
            unreachable!()
        };
        let json = to_json(&tags, &options);
        assert_eq!(json["model"], "style");
        let keys: Vec<_> = json["subsets"]["10_img"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["y", "u", "w"]);
        assert_eq!(json["subsets"]["2_reg"]["solo"], 1);
    }
}
