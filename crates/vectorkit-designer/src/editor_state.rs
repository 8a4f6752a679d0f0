//! Editor session state for UI integration.
//!
//! Owns the scene, the history and every tool, routes pointer events to the
//! active tool and records a history step after each committed change.

use tracing::{debug, info};
use vectorkit_core::{shared, ObjectId, Result, Shared};
use vectorkit_settings::Config;

use crate::arrow::RightAngleArrowTool;
use crate::brush::MembraneBrush;
use crate::eraser::{EraseReport, EraserEngine};
use crate::history::HistoryManager;
use crate::persistence::SnapshotStore;
use crate::scene::{Scene, SceneGraph};
use crate::text_path::{TextPathEngine, TextPathOptions, TextPathOptionsPatch};
use crate::tools::{InteractiveTool, ToolKind};

pub struct EditorState {
    scene: Shared<Scene>,
    config: Config,
    history: HistoryManager,
    eraser: EraserEngine<Scene>,
    brush: MembraneBrush<Scene>,
    arrow: RightAngleArrowTool<Scene>,
    text: TextPathEngine<Scene>,
    active: Option<ToolKind>,
    dragging: bool,
    pub is_modified: bool,
}

impl EditorState {
    /// Creates a session on an empty scene; the empty scene is history step 0.
    pub fn new(config: Config) -> Result<Self> {
        let scene = shared(Scene::new());
        let mut history = HistoryManager::with_settings(config.history.clone());
        history.save_state(&*scene.borrow())?;

        Ok(Self {
            eraser: EraserEngine::new(scene.clone(), config.eraser.clone()),
            brush: MembraneBrush::new(scene.clone(), config.brush.clone()),
            arrow: RightAngleArrowTool::new(scene.clone(), config.arrow.clone()),
            text: TextPathEngine::new(scene.clone(), config.text_path.clone()),
            scene,
            config,
            history,
            active: None,
            dragging: false,
            is_modified: false,
        })
    }

    pub fn scene(&self) -> Shared<Scene> {
        self.scene.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active
    }

    pub fn brush(&self) -> &MembraneBrush<Scene> {
        &self.brush
    }

    pub fn arrow(&self) -> &RightAngleArrowTool<Scene> {
        &self.arrow
    }

    pub fn text_engine(&self) -> &TextPathEngine<Scene> {
        &self.text
    }

    pub fn last_erase_report(&self) -> Option<&EraseReport> {
        self.eraser.last_report()
    }

    fn tool_mut(&mut self, kind: ToolKind) -> &mut dyn InteractiveTool {
        match kind {
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Brush => &mut self.brush,
            ToolKind::Arrow => &mut self.arrow,
        }
    }

    /// Switches tools, cancelling whatever the previous tool was doing.
    pub fn activate_tool(&mut self, kind: ToolKind) {
        self.cancel_tool();
        self.active = Some(kind);
        let tool = self.tool_mut(kind);
        tool.start();
        debug!("Activated tool {}", tool.name());
    }

    pub fn deactivate_tool(&mut self) {
        self.cancel_tool();
        self.active = None;
    }

    /// Aborts the gesture in progress, if any.
    pub fn cancel_tool(&mut self) {
        self.dragging = false;
        if let Some(kind) = self.active {
            let tool = self.tool_mut(kind);
            if tool.is_active() {
                tool.cancel();
            }
        }
    }

    /// Pointer pressed. Returns the committed object when a click completed one.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<Option<ObjectId>> {
        let Some(kind) = self.active else {
            return Ok(None);
        };
        let tool = self.tool_mut(kind);
        if !tool.is_active() {
            tool.start();
        }
        let completed = tool.add_point(x, y);

        match kind {
            ToolKind::Arrow if completed => self.finish_gesture(kind),
            ToolKind::Arrow => Ok(None),
            ToolKind::Eraser | ToolKind::Brush => {
                self.dragging = true;
                Ok(None)
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(kind) = self.active else {
            return;
        };
        let dragging = self.dragging;
        let tool = self.tool_mut(kind);
        match kind {
            ToolKind::Arrow => tool.update_preview(x, y),
            ToolKind::Eraser | ToolKind::Brush if dragging => {
                tool.add_point(x, y);
                tool.update_preview(x, y);
            }
            _ => {}
        }
    }

    /// Pointer released. Ends freehand gestures.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<Option<ObjectId>> {
        let Some(kind) = self.active else {
            return Ok(None);
        };
        if !self.dragging {
            return Ok(None);
        }
        self.dragging = false;
        self.tool_mut(kind).add_point(x, y);
        self.finish_gesture(kind)
    }

    fn finish_gesture(&mut self, kind: ToolKind) -> Result<Option<ObjectId>> {
        let created = self.tool_mut(kind).finish();
        let changed = match kind {
            ToolKind::Eraser => self
                .eraser
                .last_report()
                .is_some_and(|report| !report.attached.is_empty()),
            ToolKind::Brush | ToolKind::Arrow => created.is_some(),
        };
        if changed {
            self.commit()?;
        }
        Ok(created)
    }

    /// Records the current scene as a new history step.
    ///
    /// A gesture still in progress is cancelled first so the step never
    /// captures objects with their interaction suspended.
    pub fn commit(&mut self) -> Result<()> {
        self.cancel_tool();
        self.history.save_state(&*self.scene.borrow())?;
        self.is_modified = true;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.cancel_tool();
        self.history.undo(&mut *self.scene.borrow_mut())
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.cancel_tool();
        self.history.redo(&mut *self.scene.borrow_mut())
    }

    /// Places text along an object's outline and commits the result.
    pub fn add_text_on_path(
        &mut self,
        text: &str,
        object: ObjectId,
        options: Option<TextPathOptions>,
    ) -> Result<ObjectId> {
        self.cancel_tool();
        let options = options.unwrap_or_else(|| self.text.defaults());
        let id = self.text.create_on_object(text, object, options)?;
        self.commit()?;
        Ok(id)
    }

    pub fn update_text_on_path(
        &mut self,
        group: ObjectId,
        patch: &TextPathOptionsPatch,
    ) -> Result<ObjectId> {
        self.cancel_tool();
        let id = self.text.update(group, None, patch)?;
        self.commit()?;
        Ok(id)
    }

    /// Replaces the scene with a serialized document.
    ///
    /// Legacy erase strokes are migrated onto their objects and the history
    /// restarts from the loaded state. Returns whether migration changed
    /// the scene, in which case the host should redraw.
    pub fn load_document(&mut self, text: &str) -> Result<bool> {
        self.cancel_tool();
        self.scene.borrow_mut().load_scene(text)?;
        let migrated = self.eraser.migrate_legacy_strokes();
        self.history.clear();
        self.history.save_state(&*self.scene.borrow())?;
        self.is_modified = migrated;
        Ok(migrated)
    }

    pub fn save_history(&self, store: &mut dyn SnapshotStore, name: &str) -> Result<()> {
        store.save(name, &self.history.to_records())
    }

    /// Loads a stored history and restores its newest step.
    ///
    /// Returns `false` when the store has nothing under `name`.
    pub fn restore_history(&mut self, store: &dyn SnapshotStore, name: &str) -> Result<bool> {
        let Some(records) = store.load(name)? else {
            return Ok(false);
        };
        let history = HistoryManager::from_records(&records, self.config.history.clone())?;
        self.cancel_tool();
        if let Some(step) = history.current_step() {
            history.restore_state(&mut *self.scene.borrow_mut(), step)?;
        }
        info!("Restored history '{}' with {} steps", name, history.history_length());
        self.history = history;
        self.is_modified = false;
        Ok(true)
    }
}
