//! Text placed along the outline of a shape.
//!
//! Each character becomes its own text object, positioned on a sample of
//! the outline and rotated to the local tangent. The characters are grouped
//! into one scene object. The options used for a group are kept in a side
//! table so the group can be rebuilt when the text or options change.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;
use vectorkit_core::{GeometryError, ObjectId, Result, SceneError, Shared};
use vectorkit_settings::TextPathSettings;

use crate::model::{placement_transform, ObjectKind, Point, SceneObject, Style};
use crate::sampler::{sample, SampleShape};
use crate::scene::SceneGraph;

/// Samples taken per character of text.
const SAMPLES_PER_CHAR: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPathOptions {
    pub font_size: f64,
    /// Perpendicular distance from the outline to each glyph.
    pub offset: f64,
    /// Fraction of the outline skipped before the first glyph, 0.0 to 1.0.
    pub start_alignment: f64,
    pub flip: bool,
}

impl Default for TextPathOptions {
    fn default() -> Self {
        TextPathSettings::default().into()
    }
}

impl From<TextPathSettings> for TextPathOptions {
    fn from(settings: TextPathSettings) -> Self {
        Self {
            font_size: settings.font_size,
            offset: settings.offset,
            start_alignment: settings.start_alignment,
            flip: settings.flip,
        }
    }
}

/// Partial update for an existing text-on-path group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPathOptionsPatch {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub offset: Option<f64>,
    pub start_alignment: Option<f64>,
    pub flip: Option<bool>,
}

impl TextPathOptionsPatch {
    pub fn apply(&self, base: TextPathOptions) -> TextPathOptions {
        TextPathOptions {
            font_size: self.font_size.unwrap_or(base.font_size),
            offset: self.offset.unwrap_or(base.offset),
            start_alignment: self.start_alignment.unwrap_or(base.start_alignment),
            flip: self.flip.unwrap_or(base.flip),
        }
    }
}

/// Where one character ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
}

/// Computes glyph positions for `text` along `shape`.
///
/// Spaces take up a slot but produce no glyph. When the outline runs out
/// before the text does, the remaining characters are dropped.
pub fn layout(
    text: &str,
    shape: &SampleShape,
    options: &TextPathOptions,
) -> std::result::Result<Vec<GlyphPlacement>, GeometryError> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Err(GeometryError::EmptyText);
    }

    let num_samples = (chars.len() * SAMPLES_PER_CHAR).max(2);
    let samples = sample(shape, num_samples);
    let alignment = options.start_alignment.clamp(0.0, 1.0);
    let start_index = (alignment * num_samples as f64).floor() as usize;
    let step = ((num_samples - start_index.min(num_samples)) / chars.len()).max(1);
    let flip = if options.flip { PI } else { 0.0 };

    let mut placements = Vec::with_capacity(chars.len());
    for (i, ch) in chars.iter().enumerate() {
        let index = start_index + i * step;
        let Some(s) = samples.get(index) else {
            break;
        };
        if ch.is_whitespace() {
            continue;
        }
        let angle = s.angle + flip;
        let normal = angle + FRAC_PI_2;
        placements.push(GlyphPlacement {
            ch: *ch,
            position: Point::new(
                s.x + options.offset * normal.cos(),
                s.y + options.offset * normal.sin(),
            ),
            rotation: angle.to_degrees(),
        });
    }
    Ok(placements)
}

/// Everything needed to rebuild a text-on-path group.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPathRecord {
    pub text: String,
    /// Object whose outline was sampled, when the text was attached to one.
    pub source: Option<ObjectId>,
    pub shape: SampleShape,
    pub options: TextPathOptions,
}

pub struct TextPathEngine<S: SceneGraph> {
    scene: Shared<S>,
    defaults: TextPathOptions,
    records: HashMap<ObjectId, TextPathRecord>,
}

impl<S: SceneGraph> TextPathEngine<S> {
    pub fn new(scene: Shared<S>, settings: TextPathSettings) -> Self {
        Self {
            scene,
            defaults: settings.into(),
            records: HashMap::new(),
        }
    }

    pub fn defaults(&self) -> TextPathOptions {
        self.defaults
    }

    /// Lays out `text` along `shape` and adds the glyph group to the scene.
    pub fn create(
        &mut self,
        text: &str,
        shape: SampleShape,
        options: TextPathOptions,
    ) -> Result<ObjectId> {
        self.insert(TextPathRecord {
            text: text.to_string(),
            source: None,
            shape,
            options,
        })
    }

    /// Places text along the outline of an existing scene object.
    pub fn create_on_object(
        &mut self,
        text: &str,
        object: ObjectId,
        options: TextPathOptions,
    ) -> Result<ObjectId> {
        let shape = {
            let scene = self.scene.borrow();
            let target = scene
                .object(object)
                .ok_or(SceneError::ObjectNotFound { id: object })?;
            target
                .as_path_sampleable()
                .ok_or(GeometryError::NotSampleable { id: object })?
                .sample_shape()
        };
        self.insert(TextPathRecord {
            text: text.to_string(),
            source: Some(object),
            shape,
            options,
        })
    }

    /// Rebuilds a group with merged options, replacing the old group.
    ///
    /// `shape` replaces the stored outline when given. On error the old
    /// group stays in place. A record whose group is no longer in the scene
    /// is dropped and reported as not found.
    pub fn update(
        &mut self,
        group: ObjectId,
        shape: Option<SampleShape>,
        patch: &TextPathOptionsPatch,
    ) -> Result<ObjectId> {
        if self.scene.borrow().object(group).is_none() {
            if self.records.remove(&group).is_some() {
                debug!("Dropped text-on-path record of removed group {}", group);
            }
            return Err(SceneError::ObjectNotFound { id: group }.into());
        }
        let old = self
            .records
            .get(&group)
            .ok_or(SceneError::ObjectNotFound { id: group })?;
        let record = TextPathRecord {
            text: patch.text.clone().unwrap_or_else(|| old.text.clone()),
            source: old.source,
            shape: shape.unwrap_or_else(|| old.shape.clone()),
            options: patch.apply(old.options),
        };

        let mut replacement = build_group(&record)?;
        let mut scene = self.scene.borrow_mut();
        let previous = scene
            .remove_object(group)
            .ok_or(SceneError::ObjectNotFound { id: group })?;
        replacement.transform = previous.transform;
        replacement.style = previous.style;
        let id = scene.add_object(replacement);
        drop(scene);

        self.records.remove(&group);
        self.records.insert(id, record);
        debug!("Rebuilt text-on-path group {} as {}", group, id);
        Ok(id)
    }

    pub fn record(&self, group: ObjectId) -> Option<&TextPathRecord> {
        self.records.get(&group)
    }

    /// Drops the side-table entry, e.g. after the host deleted the group.
    pub fn forget(&mut self, group: ObjectId) -> Option<TextPathRecord> {
        self.records.remove(&group)
    }

    fn insert(&mut self, record: TextPathRecord) -> Result<ObjectId> {
        let group = build_group(&record)?;
        let glyphs = match &group.kind {
            ObjectKind::Group { children } => children.len(),
            _ => 0,
        };
        let id = self.scene.borrow_mut().add_object(group);
        debug!(
            "Placed {} of {} characters on path as group {}",
            glyphs,
            record.text.chars().count(),
            id
        );
        self.records.insert(id, record);
        Ok(id)
    }
}

fn build_group(record: &TextPathRecord) -> Result<SceneObject> {
    let placements = layout(&record.text, &record.shape, &record.options)?;
    let glyph_style = Style {
        stroke: None,
        fill: Some("#000000".to_string()),
        ..Style::default()
    };
    let children = placements
        .into_iter()
        .map(|g| {
            SceneObject::new(ObjectKind::Text {
                content: g.ch.to_string(),
                font_size: record.options.font_size,
            })
            .with_transform(placement_transform(g.position, g.rotation))
            .with_style(glyph_style.clone())
        })
        .collect();
    Ok(SceneObject::new(ObjectKind::Group { children }))
}
