//! The JSON records stored in `collection.json` and folder `metadata.json`.
//!
//! Both hold everything about their node except the item tree, which lives in
//! the directory structure instead.

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    nullable::{deserialize_nullable, deserialize_value},
    Collection, Event, Folder, Info, Node, Variable,
};

/// Contents of `collection.json`.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    info: Info,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    event: Option<Option<Vec<Event>>>,

    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    auth: Option<Value>,

    #[serde(
        rename = "protocolProfileBehavior",
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    protocol_profile_behavior: Option<Value>,

    /// Only an empty or `null` variable list is kept here. A non-empty one
    /// goes to `variables.json`.
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    variable: Option<Option<Vec<Variable>>>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CollectionRecord {
    /// Extracts the record of a collection.
    pub fn of(collection: &Collection) -> Self {
        Self {
            info: collection.info.clone(),
            event: collection.event.clone(),
            auth: collection.auth.clone(),
            protocol_profile_behavior: collection.protocol_profile_behavior.clone(),
            variable: collection
                .variable
                .clone()
                .filter(|variable| variable.as_ref().is_none_or(Vec::is_empty)),
            extra: collection.extra.clone(),
        }
    }

    /// Reassembles a collection from this record.
    ///
    /// `variable` replaces the variables stored in the record when present.
    pub fn into_collection(self, item: Vec<Node>, variable: Option<Vec<Variable>>) -> Collection {
        Collection {
            info: self.info,
            item,
            event: self.event,
            variable: variable.map(Some).or(self.variable),
            auth: self.auth,
            protocol_profile_behavior: self.protocol_profile_behavior,
            extra: self.extra,
        }
    }
}

/// Contents of a folder's `metadata.json`.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<Option<String>>,

    /// Missing in hand-made folders; the directory name stands in for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<NonEmptyString>,

    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    description: Option<Value>,

    #[serde(
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    auth: Option<Value>,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    variable: Option<Option<Vec<Variable>>>,

    #[serde(
        default,
        deserialize_with = "deserialize_nullable",
        skip_serializing_if = "Option::is_none"
    )]
    event: Option<Option<Vec<Event>>>,

    #[serde(
        rename = "protocolProfileBehavior",
        default,
        deserialize_with = "deserialize_value",
        skip_serializing_if = "Option::is_none"
    )]
    protocol_profile_behavior: Option<Value>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl FolderRecord {
    /// Extracts the record of a folder, leaving out its children.
    pub fn of(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            name: Some(folder.name.clone()),
            description: folder.description.clone(),
            auth: folder.auth.clone(),
            variable: folder.variable.clone(),
            event: folder.event.clone(),
            protocol_profile_behavior: folder.protocol_profile_behavior.clone(),
            extra: folder.extra.clone(),
        }
    }

    /// Reassembles a folder from this record and its children.
    ///
    /// `fallback_name` is used when the record carries no name.
    pub fn into_folder(self, fallback_name: NonEmptyString, item: Vec<Node>) -> Folder {
        Folder {
            id: self.id,
            name: self.name.unwrap_or(fallback_name),
            description: self.description,
            item,
            event: self.event,
            auth: self.auth,
            variable: self.variable,
            protocol_profile_behavior: self.protocol_profile_behavior,
            extra: self.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::RequestItem;

    fn name(s: &str) -> NonEmptyString {
        NonEmptyString::new(s.to_string()).unwrap()
    }

    #[test]
    fn collection_record_leaves_out_items_and_variables() {
        let mut collection = Collection::new(name("T"))
            .with_item(RequestItem::new(name("a"), "GET", "https://x"));
        collection.variable = Some(Some(vec![Variable {
            id: None,
            key: "base".to_string(),
            value: Some(json!("https://x")),
            kind: None,
            disabled: None,
            extra: Map::new(),
        }]));

        let record = serde_json::to_value(CollectionRecord::of(&collection)).unwrap();

        assert_eq!(record, json!({"info": {"name": "T"}}));
    }

    #[test]
    fn empty_collection_variables_stay_in_record() {
        let mut collection = Collection::new(name("T"));
        collection.variable = Some(Some(Vec::new()));

        let record = CollectionRecord::of(&collection);
        let rebuilt = record.into_collection(Vec::new(), None);

        assert_eq!(rebuilt.variable, Some(Some(Vec::new())));
    }

    #[test]
    fn folder_record_round_trips_without_children() {
        let mut folder = Folder::new(name("Auth"))
            .with_child(RequestItem::new(name("a"), "GET", "https://x"));
        folder.description = Some(json!("login flows"));
        folder.extra.insert("x-owner".to_string(), json!("team"));

        let record = FolderRecord::of(&folder);
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("item").is_none());
        assert_eq!(value["x-owner"], "team");

        let rebuilt = record.into_folder(name("unused"), folder.item.clone());
        assert_eq!(rebuilt, folder);
    }

    #[test]
    fn null_fields_survive_the_records() {
        let collection: Collection = serde_json::from_value(json!({
            "info": {"name": "T"},
            "item": [],
            "variable": null,
            "auth": null
        }))
        .unwrap();
        let record = serde_json::to_value(CollectionRecord::of(&collection)).unwrap();
        assert_eq!(
            record,
            json!({"info": {"name": "T"}, "variable": null, "auth": null})
        );

        let raw = json!({"name": "Auth", "description": null, "event": null});
        let record: FolderRecord = serde_json::from_value(raw.clone()).unwrap();
        let folder = record.into_folder(name("unused"), Vec::new());
        assert_eq!(folder.description, Some(Value::Null));
        assert_eq!(folder.event, Some(None));
        assert_eq!(serde_json::to_value(FolderRecord::of(&folder)).unwrap(), raw);
    }

    #[test]
    fn nameless_folder_record_uses_fallback() {
        let record: FolderRecord = serde_json::from_value(json!({})).unwrap();
        let folder = record.into_folder(name("Users"), Vec::new());
        assert_eq!(folder.name.as_str(), "Users");
    }
}
