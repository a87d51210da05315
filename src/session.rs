// Dashboard session: an arena of chart components and the single edit slot

use crate::assign::{self, EditEvent};
use crate::catalog::{self, DatasetCatalog};
use crate::compiler;
use crate::error::SessionError;
use crate::ir::RenderSpec;
use crate::model::{ChartDocument, ChartKind};
use crate::rows::RowSet;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct ChartComponent {
    pub id: ComponentId,
    pub document: ChartDocument,
    /// JSON of the last committed document
    pub frozen: Option<String>,
}

#[derive(Debug, Clone)]
struct EditSession {
    component: ComponentId,
    draft: ChartDocument,
}

/// Removed components leave a `None` slot so ids stay stable.
#[derive(Debug, Default)]
pub struct Dashboard {
    components: Vec<Option<ChartComponent>>,
    editing: Option<EditSession>,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard::default()
    }

    /// Add an empty chart of `kind`
    pub fn add_chart(&mut self, kind: ChartKind) -> ComponentId {
        self.insert(ChartDocument { kind, ..ChartDocument::default() })
    }

    /// Add a previously saved document
    pub fn insert(&mut self, document: ChartDocument) -> ComponentId {
        let id = ComponentId(self.components.len());
        self.components.push(Some(ChartComponent { id, document, frozen: None }));
        log::debug!("added chart component #{}", id.0);
        id
    }

    /// Remove a component, discarding its edit session if one is open
    pub fn remove(&mut self, id: ComponentId) -> Result<ChartComponent, SessionError> {
        let removed = self
            .components
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SessionError::UnknownComponent(id.0))?;
        if self.editing.as_ref().is_some_and(|s| s.component == id) {
            self.editing = None;
        }
        Ok(removed)
    }

    pub fn component(&self, id: ComponentId) -> Result<&ChartComponent, SessionError> {
        self.components
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(SessionError::UnknownComponent(id.0))
    }

    pub fn components(&self) -> impl Iterator<Item = &ChartComponent> {
        self.components.iter().flatten()
    }

    /// Open the edit session for `id`. Re-opening the component already
    /// being edited keeps its draft.
    pub fn begin_edit(&mut self, id: ComponentId) -> Result<&ChartDocument, SessionError> {
        let document = self.component(id)?.document.clone();
        match self.editing() {
            Some(editing) if editing != id => {
                return Err(SessionError::AlreadyEditing { editing: editing.0 });
            }
            Some(_) => {}
            None => {
                log::debug!("editing chart component #{}", id.0);
                self.editing = Some(EditSession { component: id, draft: document });
            }
        }
        self.draft().ok_or(SessionError::NotEditing)
    }

    pub fn editing(&self) -> Option<ComponentId> {
        self.editing.as_ref().map(|s| s.component)
    }

    pub fn draft(&self) -> Option<&ChartDocument> {
        self.editing.as_ref().map(|s| &s.draft)
    }

    /// Apply one edit to the draft. A rejected edit leaves the draft unchanged.
    pub fn apply(&mut self, event: EditEvent) -> Result<&ChartDocument, SessionError> {
        let session = self.editing.as_mut().ok_or(SessionError::NotEditing)?;
        session.draft = assign::apply(&session.draft, event)?;
        Ok(&session.draft)
    }

    /// Validate the draft, freeze it to JSON and close the session.
    /// On a validation failure the session stays open.
    pub fn commit(&mut self) -> Result<&ChartComponent, SessionError> {
        let session = self.editing.as_ref().ok_or(SessionError::NotEditing)?;
        let id = session.component;

        // 1. Validate
        validate::validate_for_commit(&session.draft.data, session.draft.kind)?;

        // 2. Freeze
        let mut document = session.draft.clone();
        document.data.is_configured = true;
        document.data.held_metrics.clear();
        let frozen = serde_json::to_string(&document).map_err(|e| SessionError::Serialize(e.to_string()))?;

        // 3. Store
        let slot = self
            .components
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SessionError::UnknownComponent(id.0))?;
        slot.document = document;
        slot.frozen = Some(frozen);
        self.editing = None;
        log::debug!("committed chart component #{}", id.0);
        Ok(slot)
    }

    /// Drop the draft; the component keeps its last committed document
    pub fn cancel(&mut self) -> Result<ComponentId, SessionError> {
        let session = self.editing.take().ok_or(SessionError::NotEditing)?;
        log::debug!("cancelled edit of chart component #{}", session.component.0);
        Ok(session.component)
    }

    /// Compile a component; the component under edit compiles its draft
    pub fn compile(&self, id: ComponentId, rows: &RowSet) -> Result<RenderSpec, SessionError> {
        let document = match &self.editing {
            Some(session) if session.component == id => &session.draft,
            _ => &self.component(id)?.document,
        };
        Ok(compiler::compile(rows, document.kind, &document.data, &document.style, document.container))
    }

    /// Flag fields missing from `catalog` on every component bound to its
    /// dataset, the open draft included. Returns the flagged ids per component.
    pub fn mark_stale(&mut self, catalog: &DatasetCatalog) -> Vec<(ComponentId, Vec<String>)> {
        let dataset = Some(catalog.dataset_id.as_str());
        let mut flagged = Vec::new();

        for component in self.components.iter_mut().flatten() {
            if component.document.data.dataset_id.as_deref() != dataset {
                continue;
            }
            let stale = catalog::mark_stale_fields(&mut component.document.data, catalog);
            if !stale.is_empty() {
                flagged.push((component.id, stale));
            }
        }
        if let Some(session) = self.editing.as_mut() {
            if session.draft.data.dataset_id.as_deref() == dataset {
                catalog::mark_stale_fields(&mut session.draft.data, catalog);
            }
        }
        flagged
    }
}
