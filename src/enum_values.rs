// Paginated distinct-value pickers for enum filter conditions
//
// Fetching itself belongs to the host. A picker hands out a FetchTicket per
// page and accepts the result later; tickets from a superseded or closed
// picker are ignored.

use std::collections::HashMap;

use crate::catalog::DatasetField;
use crate::error::FetchError;

/// Rows requested per page; a shorter page means the list is exhausted
pub const ENUM_PAGE_SIZE: usize = 100;

/// Identity a fetch is keyed to. Choosing another field yields a new key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PickerKey {
    pub condition_id: String,
    pub field_id: String,
}

impl PickerKey {
    pub fn new(condition_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        PickerKey { condition_id: condition_id.into(), field_id: field_id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub dataset_id: String,
    pub field_id: String,
    pub offset: usize,
    pub limit: usize,
}

/// Host-side provider of distinct values
pub trait DistinctValueSource {
    fn fetch_page(&self, request: &PageRequest) -> Result<Vec<String>, FetchError>;
}

/// A page fetch handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: PickerKey,
    pub generation: u64,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Applied { appended: usize, exhausted: bool },
    Failed(FetchError),
    /// The picker was closed or reopened since the ticket was issued
    Stale,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumPicker {
    pub values: Vec<String>,
    pub exhausted: bool,
    pub loading: bool,
    pub last_error: Option<FetchError>,
    generation: u64,
    next_offset: usize,
}

/// Every open picker of one dataset
#[derive(Debug, Default)]
pub struct EnumPickers {
    dataset_id: String,
    pickers: HashMap<PickerKey, EnumPicker>,
    generation: u64,
}

impl EnumPickers {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        EnumPickers { dataset_id: dataset_id.into(), ..EnumPickers::default() }
    }

    /// Open (or reopen) a picker and request its first page
    pub fn open(&mut self, key: PickerKey) -> FetchTicket {
        self.generation += 1;
        let picker = EnumPicker { generation: self.generation, loading: true, ..EnumPicker::default() };
        self.pickers.insert(key.clone(), picker);
        self.ticket(key, self.generation, 0)
    }

    /// Open the picker of `condition_id` for a catalog field. Fields without a
    /// distinct-value list are refused before any fetch is issued.
    pub fn open_field(&mut self, condition_id: &str, field: &DatasetField) -> Result<FetchTicket, FetchError> {
        if !field.enumerable {
            return Err(FetchError::NotEnumerable(field.field_id.clone()));
        }
        Ok(self.open(PickerKey::new(condition_id, field.field_id.as_str())))
    }

    /// Next page on scroll-to-bottom. `None` while a page is in flight, once
    /// exhausted, or for a picker that is not open.
    pub fn load_more(&mut self, key: &PickerKey) -> Option<FetchTicket> {
        let picker = self.pickers.get_mut(key)?;
        if picker.loading || picker.exhausted {
            return None;
        }
        picker.loading = true;
        let (generation, offset) = (picker.generation, picker.next_offset);
        Some(self.ticket(key.clone(), generation, offset))
    }

    /// Accept the result of a ticket
    pub fn deliver(&mut self, ticket: &FetchTicket, result: Result<Vec<String>, FetchError>) -> Delivery {
        let picker = match self.pickers.get_mut(&ticket.key) {
            Some(p) if p.generation == ticket.generation && p.next_offset == ticket.request.offset => p,
            _ => {
                log::debug!(
                    "discarding stale page for '{}' at offset {}",
                    ticket.key.field_id,
                    ticket.request.offset
                );
                return Delivery::Stale;
            }
        };

        picker.loading = false;
        match result {
            Ok(page) => {
                let appended = page.len();
                picker.exhausted = appended < ticket.request.limit;
                picker.next_offset += appended;
                picker.values.extend(page);
                picker.last_error = None;
                Delivery::Applied { appended, exhausted: picker.exhausted }
            }
            Err(err) => {
                log::warn!("distinct values for '{}' failed: {}", ticket.key.field_id, err);
                picker.last_error = Some(err.clone());
                Delivery::Failed(err)
            }
        }
    }

    /// Run a ticket against `source` synchronously and deliver it
    pub fn fulfil(&mut self, source: &dyn DistinctValueSource, ticket: &FetchTicket) -> Delivery {
        let result = source.fetch_page(&ticket.request);
        self.deliver(ticket, result)
    }

    /// Close a picker. Its in-flight fetch is not aborted, its result is dropped.
    pub fn close(&mut self, key: &PickerKey) -> bool {
        self.pickers.remove(key).is_some()
    }

    pub fn picker(&self, key: &PickerKey) -> Option<&EnumPicker> {
        self.pickers.get(key)
    }

    fn ticket(&self, key: PickerKey, generation: u64, offset: usize) -> FetchTicket {
        let request = PageRequest {
            dataset_id: self.dataset_id.clone(),
            field_id: key.field_id.clone(),
            offset,
            limit: ENUM_PAGE_SIZE,
        };
        FetchTicket { key, generation, request }
    }
}
