use serde::{Deserialize, Deserializer, Serialize};

/// A downloadable file inside an archive item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveFile {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: u64,
    #[serde(default)]
    pub format: String,
}

impl ArchiveFile {
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{:.1} {}", value, UNITS[unit])
        }
    }
}

/// Response of the `metadata/{identifier}` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetadataResponse {
    pub files: Vec<ArchiveFile>,
    pub metadata: ArchiveMetadata,
    pub server: String,
    pub dir: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArchiveMetadata {
    #[serde(deserialize_with = "lenient_text")]
    pub identifier: String,
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub mediatype: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub creator: String,
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(deserialize_with = "lenient_text")]
    pub publicdate: String,
    #[serde(deserialize_with = "lenient_text")]
    pub addeddate: String,
    #[serde(deserialize_with = "lenient_text")]
    pub uploader: String,
}

// The metadata API sends sizes as strings and occasionally as numbers.
fn lenient_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Number(u64),
        Text(String),
        Null,
    }

    Ok(match Size::deserialize(deserializer)? {
        Size::Number(n) => n,
        Size::Text(s) => s.trim().parse().unwrap_or(0),
        Size::Null => 0,
    })
}

// Multi-valued fields come back as arrays.
pub(super) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        One(String),
        Many(Vec<String>),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::One(s) => s,
        Text::Many(v) => v.join(", "),
        Text::Number(n) => n.to_string(),
        Text::Null => String::new(),
    })
}
