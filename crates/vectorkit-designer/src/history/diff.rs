//! Differences between two serialized scenes.
//!
//! Scenes are compared as JSON documents: objects are matched by their
//! `id` field and compared by value. Anything outside the object list and
//! the background must be identical for a diff to be possible.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const OBJECTS_KEY: &str = "objects";
const BACKGROUND_KEY: &str = "background";
const ID_KEY: &str = "id";

/// A serialized scene split into the parts diffs care about.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub objects: Vec<Value>,
    pub background: Option<Value>,
    /// Remaining top-level fields, kept verbatim.
    pub rest: Map<String, Value>,
}

impl SceneState {
    pub fn parse(text: &str) -> Result<SceneState, String> {
        let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let Value::Object(mut rest) = value else {
            return Err("scene is not a JSON object".to_string());
        };
        let objects = match rest.remove(OBJECTS_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(objects)) => objects,
            Some(_) => return Err("scene objects are not an array".to_string()),
        };
        let background = rest.remove(BACKGROUND_KEY);
        Ok(SceneState {
            objects,
            background,
            rest,
        })
    }

    pub fn to_text(&self) -> Result<String, String> {
        let mut map = self.rest.clone();
        if let Some(background) = &self.background {
            map.insert(BACKGROUND_KEY.to_string(), background.clone());
        }
        map.insert(OBJECTS_KEY.to_string(), Value::Array(self.objects.clone()));
        serde_json::to_string(&Value::Object(map)).map_err(|e| e.to_string())
    }

    /// Object ids in draw order, `None` if any object lacks an id or ids repeat.
    fn ids(&self) -> Option<Vec<String>> {
        let mut seen = HashSet::new();
        self.objects
            .iter()
            .map(|obj| object_key(obj).filter(|key| seen.insert(key.clone())))
            .collect()
    }
}

fn object_key(obj: &Value) -> Option<String> {
    match obj.get(ID_KEY) {
        None | Some(Value::Null) => None,
        Some(id) => Some(id.to_string()),
    }
}

/// New background value; `value: None` means the background was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundChange {
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDiff {
    #[serde(default)]
    pub added: Vec<Value>,
    #[serde(default)]
    pub modified: Vec<Value>,
    /// Ids of removed objects.
    #[serde(default)]
    pub removed: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundChange>,
    /// Final draw order, present only when applying the changes in list
    /// order would not reproduce it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<Value>>,
}

impl SceneDiff {
    /// Diff turning `base` into `current`, or `None` if the change cannot
    /// be expressed as object edits plus a background change.
    pub fn between(base: &SceneState, current: &SceneState) -> Option<SceneDiff> {
        if base.rest != current.rest {
            return None;
        }
        let base_ids = base.ids()?;
        let current_ids = current.ids()?;

        let base_by_id: HashMap<&str, &Value> = base_ids
            .iter()
            .map(String::as_str)
            .zip(base.objects.iter())
            .collect();
        let current_set: HashSet<&str> = current_ids.iter().map(String::as_str).collect();

        let mut diff = SceneDiff::default();
        for (key, obj) in current_ids.iter().zip(current.objects.iter()) {
            match base_by_id.get(key.as_str()) {
                None => diff.added.push(obj.clone()),
                Some(old) if *old != obj => diff.modified.push(obj.clone()),
                Some(_) => {}
            }
        }
        for (key, obj) in base_ids.iter().zip(base.objects.iter()) {
            if !current_set.contains(key.as_str()) {
                if let Some(id) = obj.get(ID_KEY) {
                    diff.removed.push(id.clone());
                }
            }
        }
        if base.background != current.background {
            diff.background = Some(BackgroundChange {
                value: current.background.clone(),
            });
        }

        let naive = diff.apply(base).ok()?;
        if naive.ids()? != current_ids {
            diff.order = Some(
                current
                    .objects
                    .iter()
                    .filter_map(|obj| obj.get(ID_KEY).cloned())
                    .collect(),
            );
        }
        Some(diff)
    }

    /// Rebuilds the state this diff was computed for from its base.
    ///
    /// Removals are applied first, then additions are appended, then
    /// modified objects replace their namesakes, then the background and
    /// the draw order are applied.
    pub fn apply(&self, base: &SceneState) -> Result<SceneState, String> {
        let removed: HashSet<String> = self.removed.iter().map(Value::to_string).collect();
        let mut objects: Vec<Value> = base
            .objects
            .iter()
            .filter(|obj| object_key(obj).is_none_or(|key| !removed.contains(&key)))
            .cloned()
            .collect();
        objects.extend(self.added.iter().cloned());

        for obj in &self.modified {
            let key = object_key(obj).ok_or("modified object without id")?;
            let slot = objects
                .iter_mut()
                .find(|existing| object_key(existing).as_ref() == Some(&key))
                .ok_or_else(|| format!("modified object {key} is not in the base"))?;
            *slot = obj.clone();
        }

        let background = match &self.background {
            Some(change) => change.value.clone(),
            None => base.background.clone(),
        };

        if let Some(order) = &self.order {
            let mut by_key: HashMap<String, Value> = objects
                .into_iter()
                .filter_map(|obj| object_key(&obj).map(|key| (key, obj)))
                .collect();
            objects = order
                .iter()
                .map(|id| {
                    by_key
                        .remove(&id.to_string())
                        .ok_or_else(|| format!("ordered object {id} is missing"))
                })
                .collect::<Result<_, _>>()?;
            if !by_key.is_empty() {
                return Err("draw order does not list every object".to_string());
            }
        }

        Ok(SceneState {
            objects,
            background,
            rest: base.rest.clone(),
        })
    }
}
