use crate::domain::model::{AuditRecord, AuditReport};
use crate::utils::error::Result;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Current viewport width in CSS pixels.
pub trait Viewport {
    fn width(&self) -> u32;
}

/// Current location path, e.g. `/empresas`.
pub trait Location {
    fn path(&self) -> String;
}

impl Viewport for u32 {
    fn width(&self) -> u32 {
        *self
    }
}

impl Viewport for Cell<u32> {
    fn width(&self) -> u32 {
        self.get()
    }
}

impl<T: Viewport + ?Sized> Viewport for Rc<T> {
    fn width(&self) -> u32 {
        (**self).width()
    }
}

impl<T: Viewport + ?Sized> Viewport for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }
}

impl Location for String {
    fn path(&self) -> String {
        self.clone()
    }
}

impl Location for &str {
    fn path(&self) -> String {
        (*self).to_string()
    }
}

impl Location for RefCell<String> {
    fn path(&self) -> String {
        self.borrow().clone()
    }
}

impl<T: Location + ?Sized> Location for Rc<T> {
    fn path(&self) -> String {
        (**self).path()
    }
}

/// Yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
    /// Where `path` ends up, for log and report messages.
    fn describe(&self, path: &str) -> String;
}

pub trait AuditPipeline {
    fn extract(&self) -> Result<Vec<AuditRecord>>;
    fn transform(&self, records: Vec<AuditRecord>) -> Result<AuditReport>;
    fn load(&self, report: &AuditReport) -> Result<Vec<String>>;
}
