use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::Reflect;
use crate::error::Result;
use crate::value::Value;

/// Shared handle to a user object.
///
/// Cloning the handle shares the object. Equality is identity: two handles
/// are equal when they point at the same object, whatever its field values.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<dyn Reflect>>);

impl ObjectRef {
    pub fn new<T: Reflect>(object: T) -> Self {
        let shared: Rc<RefCell<dyn Reflect>> = Rc::new(RefCell::new(object));
        Self(shared)
    }

    /// Identity token of the object, stable for as long as it is alive.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id() == other.id()
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name().to_string()
    }

    pub fn borrow(&self) -> Ref<'_, dyn Reflect> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, dyn Reflect> {
        self.0.borrow_mut()
    }

    /// Current value of a field, `None` if the object has no such field.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.0.borrow().field(name)
    }

    pub fn set_field(&self, name: &str, value: Value) -> Result<()> {
        self.0.borrow_mut().set_field(name, value)
    }

    /// Borrows the object as its concrete type.
    pub fn get<T: Reflect>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.0.borrow(), |object| object.as_any().downcast_ref::<T>()).ok()
    }

    pub fn get_mut<T: Reflect>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.0.borrow_mut(), |object| {
            object.as_any_mut().downcast_mut::<T>()
        })
        .ok()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjectRef({}@{:#x})", object.type_name(), self.id()),
            Err(_) => write!(f, "ObjectRef(<borrowed>@{:#x})", self.id()),
        }
    }
}
