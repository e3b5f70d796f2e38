//! Single-view board: the class list, the create form, and the user actions
//! that drive the API. Every successful mutation re-fetches the whole list.

use std::fmt::Write as _;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::client::ClassesClient;
use crate::models::{Class, CreateClassRequest};

/// Number of label inputs on the create form.
pub const SLOT_INPUTS: usize = 6;

pub const CONFIRM_DUPLICATE: &str = "Duplicate this class? (assignments will be cleared)";
pub const CONFIRM_DELETE: &str = "Delete this class?";
pub const PROMPT_ASSIGNEE: &str = "Enter the assignee's name:";

/// Blocking dialogs shown to the user.
#[async_trait]
pub trait Prompter: Send {
    async fn confirm(&mut self, message: &str) -> bool;
    /// `None` when the user cancels.
    async fn prompt(&mut self, message: &str) -> Option<String>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("class name is required")]
    MissingName,
    #[error("at least one time slot is required")]
    MissingSlots,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassForm {
    pub name: String,
    pub date: String,
    pub slots: [String; SLOT_INPUTS],
}

impl ClassForm {
    /// Blank label inputs are dropped; the rest keep their input order.
    pub fn to_request(&self) -> Result<CreateClassRequest, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        let time_slots: Vec<String> = self
            .slots
            .iter()
            .filter(|label| !label.trim().is_empty())
            .cloned()
            .collect();
        if time_slots.is_empty() {
            return Err(FormError::MissingSlots);
        }
        Ok(CreateClassRequest {
            name: self.name.clone(),
            date: self.date.clone(),
            time_slots,
        })
    }
}

pub struct Board {
    client: ClassesClient,
    classes: Vec<Class>,
    show_create_form: bool,
    form: ClassForm,
}

impl Board {
    pub fn new(client: ClassesClient) -> Self {
        Self {
            client,
            classes: Vec::new(),
            show_create_form: false,
            form: ClassForm::default(),
        }
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn form(&self) -> &ClassForm {
        &self.form
    }

    pub fn is_form_open(&self) -> bool {
        self.show_create_form
    }

    /// Replaces the list with the server's. A failed fetch keeps the old list.
    pub async fn refresh(&mut self) {
        match self.client.list().await {
            Ok(classes) => {
                debug!(count = classes.len(), "classes fetched");
                self.classes = classes;
            }
            Err(err) => error!("Error fetching classes: {err}"),
        }
    }

    pub fn open_form(&mut self) {
        self.show_create_form = true;
    }

    pub fn cancel_form(&mut self) {
        self.show_create_form = false;
        self.form = ClassForm::default();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.form.date = date.into();
    }

    /// Returns false when `index` is past the last input.
    pub fn set_slot(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.form.slots.get_mut(index) {
            Some(slot) => {
                *slot = label.into();
                true
            }
            None => false,
        }
    }

    /// Form errors are returned; API failures are logged and leave the form
    /// untouched.
    pub async fn submit_create(&mut self) -> Result<(), FormError> {
        let request = self.form.to_request()?;
        match self.client.create(&request).await {
            Ok(created) => {
                debug!(class_id = created.id, "class created");
                self.cancel_form();
                self.refresh().await;
            }
            Err(err) => error!("Error creating class: {err}"),
        }
        Ok(())
    }

    pub async fn duplicate(&mut self, class_id: i64, prompter: &mut dyn Prompter) {
        if !prompter.confirm(CONFIRM_DUPLICATE).await {
            return;
        }
        match self.client.duplicate(class_id).await {
            Ok(_) => self.refresh().await,
            Err(err) => error!("Error duplicating class: {err}"),
        }
    }

    pub async fn delete(&mut self, class_id: i64, prompter: &mut dyn Prompter) {
        if !prompter.confirm(CONFIRM_DELETE).await {
            return;
        }
        match self.client.delete(class_id).await {
            Ok(_) => self.refresh().await,
            Err(err) => error!("Error deleting class: {err}"),
        }
    }

    /// The entered name is trimmed; an empty answer clears the slot.
    pub async fn assign(&mut self, class_id: i64, slot_id: i64, prompter: &mut dyn Prompter) {
        let Some(name) = prompter.prompt(PROMPT_ASSIGNEE).await else {
            return;
        };
        match self.client.assign(class_id, slot_id, name.trim()).await {
            Ok(_) => self.refresh().await,
            Err(err) => error!("Error assigning slot: {err}"),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.classes.is_empty() {
            out.push_str("No classes yet.\n");
            out.push_str("Use \"new\" to create the first one.\n");
            return out;
        }
        for class in &self.classes {
            let _ = write!(out, "[{}] {}", class.id, class.name);
            if !class.date.is_empty() {
                let _ = write!(out, " ({})", class.date);
            }
            out.push('\n');
            for slot in &class.time_slots {
                let assignee = if slot.is_assigned() {
                    slot.assigned_to.as_str()
                } else {
                    "click to assign"
                };
                let _ = writeln!(out, "  <{}> {}: {}", slot.id, slot.label, assignee);
            }
        }
        out
    }
}
