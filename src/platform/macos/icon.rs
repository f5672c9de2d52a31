//! Application icon lookup.
//!
//! Resolves the frontmost process to its `.app` bundle, reads
//! `CFBundleIconFile` from the bundle's `Info.plist`, and decodes the
//! referenced `.icns` into small RGBA pixel data. Every step returns
//! `None` on failure; an item list without icons is still useful.

use std::path::Path;
use std::sync::Arc;

use cocoa::base::{id, nil};
use icns::{IconFamily, IconType, PixelFormat};
use objc::{class, msg_send, sel, sel_impl};

use crate::types::IconData;

/// Icon of the application owning `pid`, decoded for display.
pub fn app_icon_for_pid(pid: i32) -> Option<IconData> {
    let bundle = bundle_path_for_pid(pid)?;
    load_bundle_icon(Path::new(&bundle))
}

/// `.app` bundle path of a running process, via `NSRunningApplication`.
fn bundle_path_for_pid(pid: i32) -> Option<String> {
    unsafe {
        let app: id = msg_send![
            class!(NSRunningApplication),
            runningApplicationWithProcessIdentifier: pid
        ];
        if app == nil {
            return None;
        }
        let url: id = msg_send![app, bundleURL];
        if url == nil {
            return None;
        }
        let path: id = msg_send![url, path];
        if path == nil {
            return None;
        }
        let utf8: *const std::os::raw::c_char = msg_send![path, UTF8String];
        if utf8.is_null() {
            return None;
        }
        Some(std::ffi::CStr::from_ptr(utf8).to_string_lossy().into_owned())
    }
}

/// Decode the bundle's declared icon file into RGBA pixels.
fn load_bundle_icon(bundle: &Path) -> Option<IconData> {
    let declared = icon_file_name(bundle)?;
    let file = if declared.ends_with(".icns") {
        declared
    } else {
        format!("{declared}.icns")
    };
    decode_icns(&bundle.join("Contents/Resources").join(file))
}

/// `CFBundleIconFile` from `Contents/Info.plist`.
fn icon_file_name(bundle: &Path) -> Option<String> {
    let info = plist::Value::from_file(bundle.join("Contents/Info.plist")).ok()?;
    info.as_dictionary()
        .and_then(|dict| dict.get("CFBundleIconFile"))
        .and_then(|value| value.as_string())
        .map(str::to_string)
}

fn decode_icns(path: &Path) -> Option<IconData> {
    let reader = std::io::BufReader::new(std::fs::File::open(path).ok()?);
    let family = IconFamily::read(reader).ok()?;

    // Small sizes first; the result is rendered at list-row scale. Modern
    // bundles often ship only the large retina variants, hence the tail.
    let preferred = [
        IconType::RGBA32_32x32,
        IconType::RGB24_32x32,
        IconType::RGBA32_32x32_2x,
        IconType::RGBA32_128x128,
        IconType::RGBA32_256x256,
        IconType::RGBA32_512x512,
    ];

    for icon_type in preferred {
        if let Ok(image) = family.get_icon_with_type(icon_type) {
            let rgba = image.convert_to(PixelFormat::RGBA);
            return Some(IconData::Rgba {
                width: rgba.width(),
                height: rgba.height(),
                pixels: Arc::new(rgba.into_data().into_vec()),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bundle_yields_no_icon() {
        assert!(load_bundle_icon(Path::new("/nonexistent/Fake.app")).is_none());
    }

    #[test]
    fn test_unresolvable_pid_yields_no_icon() {
        // pid -1 never names a running application.
        assert!(app_icon_for_pid(-1).is_none());
    }
}
