//! macOS accessibility backend.
//!
//! Implements the frontmost-application interface over the system-wide
//! accessibility element: focused application, its process id, the
//! `AXMenuBar` element's children as top-level menus, and the owning
//! bundle's icon.

pub mod element;
pub mod icon;
pub mod permissions;

pub use element::AxNode;

use accessibility::attribute::AXAttribute;
use accessibility::AXUIElement;
use accessibility_sys::{
    kAXErrorSuccess, kAXFocusedApplicationAttribute, kAXMenuBarAttribute, AXUIElementGetPid,
    AXUIElementRef,
};
use core_foundation::base::{CFType, TCFType};
use core_foundation::string::CFString;

use crate::search::{FrontmostApp, FrontmostSource};
use crate::types::{Attr, MenuError};
use crate::walker::MenuNode;

/// The live system as a [`FrontmostSource`].
pub struct SystemFrontmost;

impl SystemFrontmost {
    pub fn new() -> Self {
        SystemFrontmost
    }
}

impl Default for SystemFrontmost {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontmostSource for SystemFrontmost {
    type Node = AxNode;

    fn frontmost_pid(&self) -> Option<i32> {
        use cocoa::base::{id, nil};
        use objc::{class, msg_send, sel, sel_impl};

        unsafe {
            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let app: id = msg_send![workspace, frontmostApplication];
            if app == nil {
                return None;
            }
            let pid: libc::pid_t = msg_send![app, processIdentifier];
            Some(pid)
        }
    }

    fn frontmost(&self) -> Result<FrontmostApp<AxNode>, MenuError> {
        if !permissions::trusted() {
            return Err(MenuError::PermissionDenied);
        }

        let app = focused_application().ok_or(MenuError::NoFrontmostApp)?;

        let mut pid: libc::pid_t = 0;
        let err = unsafe { AXUIElementGetPid(app.as_concrete_TypeRef(), &mut pid) };
        if err != kAXErrorSuccess {
            return Err(MenuError::NoFrontmostApp);
        }

        let menu_bar = copy_menu_bar(&app)?;
        let menus = match AxNode::new(menu_bar).attributes().children {
            Attr::Value(children) => children
                .into_iter()
                .filter_map(|child| child.value())
                .collect(),
            Attr::Missing | Attr::Malformed => {
                return Err(MenuError::MenuBarUnavailable(
                    "menu bar exposes no children".into(),
                ))
            }
        };

        Ok(FrontmostApp {
            pid,
            menus,
            icon: icon::app_icon_for_pid(pid),
        })
    }

    fn accessibility_trusted(&self) -> bool {
        permissions::trusted()
    }

    fn prompt_accessibility(&self) {
        permissions::prompt();
    }
}

/// The application currently receiving keyboard focus, from the
/// system-wide element.
fn focused_application() -> Option<AXUIElement> {
    let system_wide = AXUIElement::system_wide();
    let attr =
        AXAttribute::<CFType>::new(&CFString::from_static_string(kAXFocusedApplicationAttribute));
    let value = system_wide.attribute(&attr).ok()?;

    if value.type_of() == AXUIElement::type_id() {
        let ptr = value.as_CFTypeRef();
        Some(unsafe { AXUIElement::wrap_under_get_rule(ptr as AXUIElementRef) })
    } else {
        None
    }
}

/// The application's `AXMenuBar` element.
fn copy_menu_bar(app: &AXUIElement) -> Result<AXUIElement, MenuError> {
    let attr = AXAttribute::<CFType>::new(&CFString::from_static_string(kAXMenuBarAttribute));
    let value = app
        .attribute(&attr)
        .map_err(|e| MenuError::MenuBarUnavailable(format!("{:?}", e)))?;

    if value.type_of() == AXUIElement::type_id() {
        let ptr = value.as_CFTypeRef();
        Ok(unsafe { AXUIElement::wrap_under_get_rule(ptr as AXUIElementRef) })
    } else {
        Err(MenuError::MenuBarUnavailable(
            "AXMenuBar is not an element".into(),
        ))
    }
}
