//! Host scene graph seam and the in-memory reference scene.
//!
//! Tools never own scene objects. They receive a [`Shared`] handle to
//! something implementing [`SceneGraph`] and refer to objects by id only.
//!
//! [`Shared`]: vectorkit_core::Shared

use serde::{Deserialize, Serialize};
use vectorkit_core::{ObjectId, Result, SceneError};

use crate::model::{Rect, SceneObject, Transform};

/// Current version written into serialized scenes.
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Operations the editing kernel needs from a host scene graph.
pub trait SceneGraph {
    /// Adds an object on top of the draw order and returns its id.
    fn add_object(&mut self, object: SceneObject) -> ObjectId;

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject>;

    /// Ids of top-level objects in draw order.
    fn object_ids(&self) -> Vec<ObjectId>;

    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>;

    fn serialize_scene(&self) -> Result<String>;

    /// Replaces the whole scene with a serialized one.
    fn load_scene(&mut self, text: &str) -> Result<()>;

    fn objects(&self) -> Vec<&SceneObject> {
        self.object_ids()
            .into_iter()
            .filter_map(|id| self.object(id))
            .collect()
    }

    fn bounding_rect(&self, id: ObjectId) -> Option<Rect> {
        self.object(id).and_then(SceneObject::bounding_rect)
    }

    fn transform_matrix(&self, id: ObjectId) -> Option<Transform> {
        self.object(id).map(|o| o.transform)
    }

    /// Returns `false` when the object does not exist.
    fn set_interactive(&mut self, id: ObjectId, interactive: bool) -> bool {
        match self.object_mut(id) {
            Some(obj) => {
                obj.interactive = interactive;
                true
            }
            None => false,
        }
    }

    fn is_interactive(&self, id: ObjectId) -> Option<bool> {
        self.object(id).map(|o| o.interactive)
    }
}

/// Serialized form of a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

/// In-memory scene graph with draw-ordered objects.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    background: Option<String>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            background: None,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.background = None;
    }

    pub fn translate_object(&mut self, id: ObjectId, dx: f64, dy: f64) -> Result<()> {
        self.transform_object(id, &Transform::translation(dx, dy))
    }

    /// Applies `t` after the object's current transform.
    pub fn transform_object(&mut self, id: ObjectId, t: &Transform) -> Result<()> {
        let obj = self
            .object_mut(id)
            .ok_or(SceneError::ObjectNotFound { id })?;
        obj.transform = obj.transform.then(t);
        Ok(())
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> Result<()> {
        let pos = self
            .position(id)
            .ok_or(SceneError::ObjectNotFound { id })?;
        let obj = self.objects.remove(pos);
        self.objects.push(obj);
        Ok(())
    }

    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            version: SCENE_FORMAT_VERSION,
            background: self.background.clone(),
            objects: self.objects.clone(),
        }
    }

    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

impl SceneGraph for Scene {
    fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        if !object.id.is_assigned() || self.position(object.id).is_some() {
            object.id = self.allocate_id();
        } else {
            self.next_id = self.next_id.max(object.id.get() + 1);
        }
        let id = object.id;
        self.objects.push(object);
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let pos = self.position(id)?;
        Some(self.objects.remove(pos))
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn objects(&self) -> Vec<&SceneObject> {
        self.objects.iter().collect()
    }

    fn serialize_scene(&self) -> Result<String> {
        serde_json::to_string(&self.to_document()).map_err(|e| {
            SceneError::Serialization {
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn load_scene(&mut self, text: &str) -> Result<()> {
        let document: SceneDocument =
            serde_json::from_str(text).map_err(|e| SceneError::Deserialization {
                reason: e.to_string(),
            })?;

        let max_id = document
            .objects
            .iter()
            .map(|o| o.id.get())
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.background = document.background;
        self.objects = Vec::with_capacity(document.objects.len());
        for obj in document.objects {
            self.add_object(obj);
        }
        Ok(())
    }
}
