//! `MenuNode` implementation over `AXUIElement`.
//!
//! Each node fetches its attribute bundle with one
//! `AXUIElementCopyMultipleAttributeValues` call: the accessibility API
//! crosses a process boundary and a round trip per attribute per node is
//! what makes naive traversals slow. Per-entry failures come back as
//! `AXValue` error sentinels and decode to [`Attr::Missing`] or
//! [`Attr::Malformed`]; nothing here escalates past the tri-state.

use std::ffi::c_void;
use std::fmt;

use accessibility::AXUIElement;
use accessibility_sys::{
    kAXChildrenAttribute, kAXEnabledAttribute, kAXErrorAttributeUnsupported, kAXErrorNoValue,
    kAXErrorSuccess, kAXMenuItemCmdCharAttribute, kAXMenuItemCmdGlyphAttribute,
    kAXMenuItemCmdModifiersAttribute, kAXPressAction, kAXTitleAttribute, kAXValueTypeAXError,
    AXError, AXUIElementCopyActionNames, AXUIElementCopyMultipleAttributeValues,
    AXUIElementPerformAction, AXUIElementRef, AXValueGetType, AXValueGetTypeID, AXValueGetValue,
    AXValueRef,
};
use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFType, TCFType};
use core_foundation::boolean::{CFBoolean, CFBooleanRef};
use core_foundation::number::{CFNumber, CFNumberRef};
use core_foundation::string::{CFString, CFStringRef};

use crate::types::{Attr, MenuError};
use crate::walker::{MenuNode, NodeAttributes};

/// Attributes fetched for every node, in batch order.
const NODE_ATTRIBUTES: [&str; 6] = [
    kAXEnabledAttribute,
    kAXTitleAttribute,
    kAXChildrenAttribute,
    kAXMenuItemCmdCharAttribute,
    kAXMenuItemCmdGlyphAttribute,
    kAXMenuItemCmdModifiersAttribute,
];

/// One accessibility element of the menu tree.
///
/// `Clone` retains the wrapped element and `Drop` releases it, so a record
/// holding an `AxNode` owns exactly one reference for its lifetime.
#[derive(Clone)]
pub struct AxNode(AXUIElement);

// CFRetain/CFRelease are thread-safe, which is all that cloning and
// dropping a node across threads requires. Every actual AX call on the
// element runs on the single dispatcher thread.
unsafe impl Send for AxNode {}
unsafe impl Sync for AxNode {}

impl AxNode {
    pub(crate) fn new(element: AXUIElement) -> Self {
        AxNode(element)
    }

    /// One batched cross-process round trip for the whole bundle.
    fn copy_attribute_batch(&self) -> Option<CFArray<CFType>> {
        let names: Vec<CFString> = NODE_ATTRIBUTES
            .iter()
            .map(|name| CFString::from_static_string(name))
            .collect();
        let names = CFArray::from_CFTypes(&names);

        let mut values: CFArrayRef = std::ptr::null();
        let err = unsafe {
            AXUIElementCopyMultipleAttributeValues(
                self.0.as_concrete_TypeRef(),
                names.as_concrete_TypeRef(),
                0,
                &mut values,
            )
        };
        if err != kAXErrorSuccess || values.is_null() {
            log::debug!("batched attribute fetch failed: AXError {}", err);
            return None;
        }
        Some(unsafe { CFArray::wrap_under_create_rule(values) })
    }
}

impl fmt::Debug for AxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AxNode")
    }
}

impl MenuNode for AxNode {
    fn attributes(&self) -> NodeAttributes<Self> {
        let values = match self.copy_attribute_batch() {
            Some(values) => values,
            None => return NodeAttributes::missing(),
        };
        if values.len() as usize != NODE_ATTRIBUTES.len() {
            log::debug!("attribute batch came back with {} entries", values.len());
            return NodeAttributes::missing();
        }

        NodeAttributes {
            enabled: match values.get(0) {
                Some(v) => decode_bool(&v),
                None => Attr::Missing,
            },
            title: match values.get(1) {
                Some(v) => decode_string(&v),
                None => Attr::Missing,
            },
            children: match values.get(2) {
                Some(v) => decode_children(&v),
                None => Attr::Missing,
            },
            shortcut_char: match values.get(3) {
                Some(v) => decode_string(&v),
                None => Attr::Missing,
            },
            shortcut_glyph: match values.get(4) {
                Some(v) => decode_i64(&v),
                None => Attr::Missing,
            },
            shortcut_modifiers: match values.get(5) {
                Some(v) => decode_i64(&v),
                None => Attr::Missing,
            },
        }
    }

    fn actions(&self) -> Attr<Vec<String>> {
        let mut names: CFArrayRef = std::ptr::null();
        let err = unsafe { AXUIElementCopyActionNames(self.0.as_concrete_TypeRef(), &mut names) };
        if err != kAXErrorSuccess || names.is_null() {
            return missing_or_malformed(err);
        }
        let names: CFArray<CFString> = unsafe { CFArray::wrap_under_create_rule(names) };
        Attr::Value(names.iter().map(|name| name.to_string()).collect())
    }

    fn press(&self) -> Result<(), MenuError> {
        let action = CFString::from_static_string(kAXPressAction);
        let err = unsafe {
            AXUIElementPerformAction(self.0.as_concrete_TypeRef(), action.as_concrete_TypeRef())
        };
        if err == kAXErrorSuccess {
            Ok(())
        } else {
            Err(MenuError::ActionFailed(format!("AXError {}", err)))
        }
    }
}

/// Extract the error code from an `AXValue` error sentinel, if the entry
/// is one.
fn sentinel_error(value: &CFType) -> Option<AXError> {
    if value.type_of() != unsafe { AXValueGetTypeID() } {
        return None;
    }
    let value_ref = value.as_CFTypeRef() as AXValueRef;
    if unsafe { AXValueGetType(value_ref) } != kAXValueTypeAXError {
        return None;
    }
    let mut code: AXError = kAXErrorSuccess;
    let filled = unsafe {
        AXValueGetValue(
            value_ref,
            kAXValueTypeAXError,
            &mut code as *mut AXError as *mut c_void,
        )
    };
    if filled as u8 != 0 {
        Some(code)
    } else {
        Some(kAXErrorAttributeUnsupported)
    }
}

fn missing_or_malformed<T>(code: AXError) -> Attr<T> {
    match code {
        kAXErrorNoValue | kAXErrorAttributeUnsupported => Attr::Missing,
        _ => Attr::Malformed,
    }
}

fn decode_bool(value: &CFType) -> Attr<bool> {
    if let Some(code) = sentinel_error(value) {
        return missing_or_malformed(code);
    }
    if value.type_of() == CFBoolean::type_id() {
        let flag =
            unsafe { CFBoolean::wrap_under_get_rule(value.as_CFTypeRef() as CFBooleanRef) };
        Attr::Value(flag.into())
    } else {
        Attr::Malformed
    }
}

fn decode_string(value: &CFType) -> Attr<String> {
    if let Some(code) = sentinel_error(value) {
        return missing_or_malformed(code);
    }
    if value.type_of() == CFString::type_id() {
        let s = unsafe { CFString::wrap_under_get_rule(value.as_CFTypeRef() as CFStringRef) };
        Attr::Value(s.to_string())
    } else {
        Attr::Malformed
    }
}

fn decode_i64(value: &CFType) -> Attr<i64> {
    if let Some(code) = sentinel_error(value) {
        return missing_or_malformed(code);
    }
    if value.type_of() == CFNumber::type_id() {
        let n = unsafe { CFNumber::wrap_under_get_rule(value.as_CFTypeRef() as CFNumberRef) };
        match n.to_i64() {
            Some(n) => Attr::Value(n),
            None => Attr::Malformed,
        }
    } else {
        Attr::Malformed
    }
}

/// Decode the children collection, one tri-state per element so an invalid
/// entry costs only its own subtree.
fn decode_children(value: &CFType) -> Attr<Vec<Attr<AxNode>>> {
    if let Some(code) = sentinel_error(value) {
        return missing_or_malformed(code);
    }
    if value.type_of() != CFArray::<CFType>::type_id() {
        return Attr::Malformed;
    }
    let array: CFArray<CFType> =
        unsafe { CFArray::wrap_under_get_rule(value.as_CFTypeRef() as CFArrayRef) };

    let mut children = Vec::with_capacity(array.len() as usize);
    for i in 0..array.len() {
        match array.get(i) {
            Some(child) if child.type_of() == AXUIElement::type_id() => {
                let element = unsafe {
                    AXUIElement::wrap_under_get_rule(child.as_CFTypeRef() as AXUIElementRef)
                };
                children.push(Attr::Value(AxNode::new(element)));
            }
            Some(_) => children.push(Attr::Malformed),
            None => children.push(Attr::Missing),
        }
    }
    Attr::Value(children)
}
