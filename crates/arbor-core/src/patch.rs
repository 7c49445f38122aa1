//! Property diffing between a host element's previous and next prop maps.

use crate::element::{event_name, PropValue, Props, CHILDREN_KEY, STYLE_KEY};
use crate::host::{HostBackend, HostId};

/// Applies the property diff policy to one host node:
///
/// - remove every previous key that is absent or changed in the next map,
///   then set every key present in the next map;
/// - event handlers are never diffed by value: the previous handler is always
///   unregistered and the next one registered, even when the same callback is
///   passed again;
/// - the nested `style` map is diffed per property with the same policy.
pub(crate) fn commit_props(
    host: &mut dyn HostBackend,
    node: HostId,
    next: &Props,
    previous: Option<&Props>,
) {
    if let Some(previous) = previous {
        for (key, value) in previous.iter() {
            if let Some(event) = event_name(key) {
                if let PropValue::Handler(handler) = value {
                    host.remove_event_listener(node, &event, handler);
                }
            } else if key == STYLE_KEY || key == CHILDREN_KEY {
                // style is diffed per property below; children never reach
                // the host as an attribute
            } else if next.get(key).map_or(true, |new_value| new_value != value) {
                host.remove_attribute(node, key);
            }
        }
    }

    let previous_style = previous.and_then(Props::style_map);
    let next_style = next.style_map();
    if let Some(previous_style) = previous_style {
        for (key, value) in previous_style {
            let stale = next_style
                .and_then(|style| style.get(key))
                .map_or(true, |new_value| new_value != value);
            if stale {
                host.remove_style_property(node, key);
            }
        }
    }
    if let Some(next_style) = next_style {
        for (key, value) in next_style {
            host.set_style_property(node, key, value);
        }
    }

    for (key, value) in next.iter() {
        if let Some(event) = event_name(key) {
            if let PropValue::Handler(handler) = value {
                host.add_event_listener(node, &event, handler.clone());
            }
        } else if key == STYLE_KEY || key == CHILDREN_KEY {
            // handled above
        } else if let Some(text) = value.as_attr_text() {
            host.set_attribute(node, key, &text);
        }
    }
}
