use crate::api::ModelInfo;
use crate::core::constants::{MODELS_FAILED_TEXT, NO_MODELS_TEXT};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelList {
    #[default]
    Loading,
    Loaded(Vec<ModelInfo>),
    Failed,
}

/// Model dropdown state. Models without vision support are disabled while
/// files are attached.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelPicker {
    pub list: ModelList,
    pub selected: Option<String>,
}

impl ModelPicker {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            list: ModelList::Loading,
            selected: initial,
        }
    }

    pub fn is_enabled(model: &ModelInfo, has_attachments: bool) -> bool {
        !has_attachments || model.vision
    }

    pub fn models(&self) -> &[ModelInfo] {
        match &self.list {
            ModelList::Loaded(models) => models,
            _ => &[],
        }
    }

    fn enabled_models(&self, has_attachments: bool) -> impl Iterator<Item = &ModelInfo> {
        self.models()
            .iter()
            .filter(move |model| Self::is_enabled(model, has_attachments))
    }

    pub fn is_disabled(&self, has_attachments: bool) -> bool {
        match self.list {
            ModelList::Loading => false,
            ModelList::Failed => true,
            ModelList::Loaded(_) => self.enabled_models(has_attachments).next().is_none(),
        }
    }

    pub fn set_models(&mut self, models: Vec<ModelInfo>, has_attachments: bool) {
        self.list = ModelList::Loaded(models);
        self.reconcile(has_attachments);
    }

    pub fn set_failed(&mut self) {
        self.list = ModelList::Failed;
        self.selected = None;
    }

    /// Keep the selection on an enabled model, falling back to the first
    /// enabled one or to nothing.
    pub fn reconcile(&mut self, has_attachments: bool) {
        if !matches!(self.list, ModelList::Loaded(_)) {
            return;
        }
        let still_valid = self.selected.as_deref().is_some_and(|id| {
            self.enabled_models(has_attachments)
                .any(|model| model.id == id)
        });
        if !still_valid {
            let first = self
                .enabled_models(has_attachments)
                .next()
                .map(|model| model.id.clone());
            self.selected = first;
        }
    }

    /// Move the selection to the next (or previous) enabled model, wrapping.
    pub fn cycle(&mut self, has_attachments: bool, forward: bool) {
        let enabled: Vec<&ModelInfo> = self.enabled_models(has_attachments).collect();
        if enabled.is_empty() {
            return;
        }
        let current = self
            .selected
            .as_deref()
            .and_then(|id| enabled.iter().position(|model| model.id == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(index), true) => (index + 1) % enabled.len(),
            (Some(index), false) => (index + enabled.len() - 1) % enabled.len(),
        };
        self.selected = Some(enabled[next].id.clone());
    }

    pub fn label(&self, has_attachments: bool) -> String {
        match &self.list {
            ModelList::Loading => match &self.selected {
                Some(id) => id.clone(),
                None => "Loading models...".to_string(),
            },
            ModelList::Failed => MODELS_FAILED_TEXT.to_string(),
            ModelList::Loaded(models) => {
                if self.is_disabled(has_attachments) {
                    return NO_MODELS_TEXT.to_string();
                }
                self.selected
                    .as_deref()
                    .and_then(|id| models.iter().find(|model| model.id == id))
                    .map(|model| model.name.clone())
                    .unwrap_or_else(|| NO_MODELS_TEXT.to_string())
            }
        }
    }
}
