use serde::Serialize;

/// Wire-ready body for one webhook notification.
///
/// Field names and nesting follow the webhook's JSON contract exactly;
/// absent identity fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub description: String,
    pub thumbnail: Thumbnail,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        EmbedField {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_to_the_webhook_wire_shape() {
        let payload = Payload {
            username: Some("App".to_string()),
            avatar_url: None,
            embeds: vec![Embed {
                description: "'boom'".to_string(),
                thumbnail: Thumbnail { url: None },
                color: 0xF44336,
                fields: vec![
                    EmbedField::inline("Level", "error"),
                    EmbedField::inline("DateTime", "2024-01-01T00:00:00.000Z"),
                ],
            }],
        };

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "username": "App",
                "avatar_url": null,
                "embeds": [{
                    "description": "'boom'",
                    "thumbnail": { "url": null },
                    "color": 0xF44336,
                    "fields": [
                        { "name": "Level", "value": "error", "inline": true },
                        { "name": "DateTime", "value": "2024-01-01T00:00:00.000Z", "inline": true }
                    ]
                }]
            })
        );
    }

    #[test]
    fn absent_identity_fields_stay_null_not_missing() {
        let payload = Payload {
            username: None,
            avatar_url: None,
            embeds: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("username").is_some_and(|v| v.is_null()));
        assert!(value.get("avatar_url").is_some_and(|v| v.is_null()));
    }
}
