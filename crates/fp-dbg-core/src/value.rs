//! Rendering of runtime values in traces.
//!
//! Generated code calls `(&&Probe(&value)).render_value()` with both traits in scope.
//! Method resolution picks [`RenderDebug`] when the value implements `Debug` and falls
//! back to [`RenderOpaque`] otherwise, so naming a non-`Debug` local never breaks the
//! build.

use std::any::type_name;
use std::fmt::Debug;

/// Widest compact rendering before switching to the pretty form.
pub const VALUE_WIDTH: usize = 80;

pub struct Probe<'a, T: ?Sized>(pub &'a T);

pub trait RenderDebug {
    fn render_value(&self) -> String;
}

pub trait RenderOpaque {
    fn render_value(&self) -> String;
}

impl<T: Debug + ?Sized> RenderDebug for &Probe<'_, T> {
    fn render_value(&self) -> String {
        render_debug(self.0)
    }
}

impl<T: ?Sized> RenderOpaque for Probe<'_, T> {
    fn render_value(&self) -> String {
        format!("<{}>", type_name::<T>())
    }
}

pub fn render_debug<T: Debug + ?Sized>(value: &T) -> String {
    let compact = format!("{value:?}");
    if compact.chars().count() <= VALUE_WIDTH && !compact.contains('\n') {
        compact
    } else {
        format!("{value:#?}")
    }
}
