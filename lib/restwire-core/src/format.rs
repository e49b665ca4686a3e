//! Wire rendering of parameter items.
//!
//! Applies the `OpenAPI` `style` / `explode` rules to the output of the
//! [`Encoder`](crate::Encoder):
//!
//! | style            | explode=true            | explode=false      |
//! |------------------|-------------------------|--------------------|
//! | `form`           | `id=3&id=4&id=5`        | `id=3,4,5`         |
//! | `spaceDelimited` | `id=3&id=4&id=5`        | `id=3 4 5`         |
//! | `pipeDelimited`  | `id=3&id=4&id=5`        | `id=3\|4\|5`       |
//! | `deepObject`     | `id[]=3&id[]=4&id[]=5`  | same as explode    |

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::directive::{EncodingDirective, Style};
use crate::param::{Key, ParameterItem, ParameterItems, trim_trailing_elements};
use crate::{Error, Result};

/// Everything but RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// [`COMPONENT`] with the RFC 3986 reserved characters left as is.
const RESERVED_ALLOWED: &AsciiSet = &COMPONENT
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Path segment set: unreserved characters and sub-delimiters stay readable.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Render the key path of an item without the parameter name.
///
/// The first field is bare and the following steps are bracketed, array
/// positions rendering as `[]`: `role[][user]`.
fn render_label(keys: &[Key]) -> String {
    let mut label = String::new();
    for (index, key) in keys.iter().enumerate() {
        match key {
            Key::Field(name) if index == 0 => label.push_str(name),
            key => {
                label.push('[');
                label.push_str(&key.to_string());
                label.push(']');
            }
        }
    }
    label
}

/// Render the query key of a parameter item.
///
/// - `deepObject` keeps every step, array markers included: `id[role][]`.
/// - Other styles drop trailing array markers; an object path then stands on
///   its own (`role[user]`) while a path starting at an array keeps the
///   parameter name (`id[][user]`).
/// - An empty path renders the parameter name.
#[must_use]
pub fn format_key(name: &str, directive: &EncodingDirective, keys: &[Key]) -> String {
    let deep_object = directive.style == Style::DeepObject;
    let keys = if deep_object {
        keys
    } else {
        trim_trailing_elements(keys)
    };
    match keys.first() {
        None => name.to_string(),
        Some(Key::Field(_)) if !deep_object => render_label(keys),
        Some(_) => {
            let mut key = name.to_string();
            for step in keys {
                key.push('[');
                key.push_str(&step.to_string());
                key.push(']');
            }
            key
        }
    }
}

/// Render query entries for one parameter, in item order.
///
/// Exploded parameters and `deepObject` produce one entry per value.
/// Otherwise a single entry under `name` joins every value, each keyed item
/// preceded by its key path: `id=role,admin,firstName,Alex`.
#[must_use]
pub fn query_entries(
    name: &str,
    directive: &EncodingDirective,
    items: &ParameterItems,
) -> Vec<(String, String)> {
    if directive.style == Style::DeepObject || directive.explode() {
        let mut entries = Vec::new();
        for item in items {
            let key = format_key(name, directive, item.keys());
            entries.extend(
                item.values()
                    .iter()
                    .map(|value| (key.clone(), value.clone())),
            );
        }
        return entries;
    }

    let parts = flat_parts(items);
    if parts.is_empty() {
        return Vec::new();
    }
    let separator = directive.style.separator().to_string();
    vec![(name.to_string(), parts.join(&separator))]
}

/// `[key, value, key, value]` list of a non-exploded parameter.
fn flat_parts(items: &ParameterItems) -> Vec<String> {
    let mut parts = Vec::new();
    for item in items {
        let keys = item.trimmed_keys();
        if !keys.is_empty() {
            parts.push(render_label(keys));
        }
        parts.extend(item.values().iter().cloned());
    }
    parts
}

/// Render a header value (`OpenAPI` `simple` style).
///
/// Headers default to `explode=false`: `role,admin,firstName,Alex`; when
/// exploded, keyed values render as `role=admin,firstName=Alex`. Arrays are
/// always comma-joined. Returns `None` when there is nothing to send.
#[must_use]
pub fn header_value(explode: bool, items: &ParameterItems) -> Option<String> {
    let parts = if explode {
        items
            .iter()
            .flat_map(exploded_header_parts)
            .collect()
    } else {
        flat_parts(items)
    };
    (!parts.is_empty()).then(|| parts.join(","))
}

fn exploded_header_parts(item: &ParameterItem) -> Vec<String> {
    let keys = item.trimmed_keys();
    if keys.is_empty() {
        return item.values().to_vec();
    }
    let label = render_label(keys);
    item.values()
        .iter()
        .map(|value| format!("{label}={value}"))
        .collect()
}

/// Render `Cookie` header entries of one parameter.
///
/// Cookies follow the query rules of the `form` style; values are
/// percent-encoded. The caller joins entries with `; `.
#[must_use]
pub fn cookie_pairs(
    name: &str,
    directive: &EncodingDirective,
    items: &ParameterItems,
) -> Vec<String> {
    query_entries(name, directive, items)
        .into_iter()
        .map(|(key, value)| format!("{key}={}", escape_query(&value, false)))
        .collect()
}

/// Substitute a path parameter into the URL path template.
///
/// Only scalars and arrays of scalars have a path form; arrays render
/// comma-joined. Objects fail with [`Error::UnsupportedParameter`].
pub fn substitute_path(template: &str, name: &str, items: &ParameterItems) -> Result<String> {
    let item = match items.find_default() {
        Some(item) if items.len() == 1 => item,
        _ => {
            return Err(Error::unsupported_parameter(
                name,
                "only scalar or array values can be substituted into the path",
            ));
        }
    };
    let value = item.values().join(",");
    let encoded = utf8_percent_encode(&value, PATH_SEGMENT).to_string();
    Ok(template.replace(&format!("{{{name}}}"), &encoded))
}

/// Percent-encode a query key or value.
#[must_use]
pub fn escape_query(text: &str, allow_reserved: bool) -> String {
    let set = if allow_reserved {
        RESERVED_ALLOWED
    } else {
        COMPONENT
    };
    utf8_percent_encode(text, set).to_string()
}

/// Ordered, already-escaped query string.
///
/// Written by hand rather than through a URL serializer so that parameters
/// with `allowReserved` keep their reserved characters verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString(String);

impl QueryString {
    /// Create an empty query string.
    #[must_use]
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Append one `key=value` pair.
    pub fn append(&mut self, key: &str, value: &str, allow_reserved: bool) {
        if !self.0.is_empty() {
            self.0.push('&');
        }
        self.0.push_str(&escape_query(key, allow_reserved));
        self.0.push('=');
        self.0.push_str(&escape_query(value, allow_reserved));
    }

    /// Append every entry of a parameter.
    pub fn extend<I>(&mut self, entries: I, allow_reserved: bool)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in entries {
            self.append(&key, &value, allow_reserved);
        }
    }

    /// Returns `true` if no pair was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The encoded query string, without the leading `?`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use insta::assert_snapshot;

    use super::*;
    use crate::directive::Location;

    fn items(entries: &[(&[Key], &[&str])]) -> ParameterItems {
        let mut items = ParameterItems::new();
        for (keys, values) in entries {
            items.add(
                keys.to_vec(),
                values.iter().map(ToString::to_string).collect(),
            );
        }
        items
    }

    fn query(name: &str, directive: &EncodingDirective, items: &ParameterItems) -> String {
        query_entries(name, directive, items)
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn directive(style: Style, explode: bool) -> EncodingDirective {
        EncodingDirective::new("id", Location::Query)
            .with_style(style)
            .with_explode(explode)
    }

    #[test]
    fn array_style_matrix() {
        let array = items(&[(&[Key::Element], &["3", "4", "5"])]);

        assert_snapshot!(query("id", &directive(Style::Form, true), &array), @"id=3&id=4&id=5");
        assert_snapshot!(query("id", &directive(Style::Form, false), &array), @"id=3,4,5");
        assert_snapshot!(query("id", &directive(Style::SpaceDelimited, false), &array), @"id=3 4 5");
        assert_snapshot!(query("id", &directive(Style::PipeDelimited, false), &array), @"id=3|4|5");
        assert_snapshot!(query("id", &directive(Style::SpaceDelimited, true), &array), @"id=3&id=4&id=5");
        assert_snapshot!(query("id", &directive(Style::DeepObject, true), &array), @"id[]=3&id[]=4&id[]=5");
        assert_snapshot!(query("id", &directive(Style::DeepObject, false), &array), @"id[]=3&id[]=4&id[]=5");
    }

    #[test]
    fn object_key_nesting() {
        let object = items(&[(&[Key::field("role")], &["admin"])]);

        assert_snapshot!(query("id", &directive(Style::Form, false), &object), @"id=role,admin");
        assert_snapshot!(query("id", &directive(Style::Form, true), &object), @"role=admin");
        assert_snapshot!(query("id", &directive(Style::DeepObject, true), &object), @"id[role]=admin");
    }

    #[test]
    fn object_with_several_fields() {
        let object = items(&[
            (&[Key::field("role")], &["admin"]),
            (&[Key::field("firstName")], &["Alex"]),
        ]);

        assert_snapshot!(query("id", &directive(Style::Form, false), &object), @"id=role,admin,firstName,Alex");
        assert_snapshot!(query("id", &directive(Style::Form, true), &object), @"role=admin&firstName=Alex");
        assert_snapshot!(query("id", &directive(Style::DeepObject, true), &object), @"id[role]=admin&id[firstName]=Alex");
    }

    #[test]
    fn nested_array_of_objects() {
        let keys = [Key::field("role"), Key::Element, Key::field("user"), Key::Element];
        let single = items(&[(&keys, &["admin"])]);
        let double = items(&[(&keys, &["admin", "anonymous"])]);
        let form = directive(Style::Form, true);

        check!(format_key("id", &form, &keys) == "role[][user]");
        assert_snapshot!(query("id", &form, &single), @"role[][user]=admin");
        assert_snapshot!(query("id", &form, &double), @"role[][user]=admin&role[][user]=anonymous");
        assert_snapshot!(
            query("id", &directive(Style::DeepObject, true), &single),
            @"id[role][][user][]=admin"
        );
    }

    #[test]
    fn key_starting_at_array_keeps_name() {
        let keys = [Key::Element, Key::field("a")];
        check!(format_key("id", &directive(Style::Form, true), &keys) == "id[][a]");
        check!(format_key("id", &directive(Style::Form, true), &[]) == "id");
        check!(format_key("id", &directive(Style::DeepObject, true), &[]) == "id");
    }

    #[test]
    fn scalar_query() {
        let scalar = items(&[(&[], &["42"])]);
        assert_snapshot!(query("limit", &directive(Style::Form, true), &scalar), @"limit=42");
        assert_snapshot!(query("limit", &directive(Style::Form, false), &scalar), @"limit=42");
        assert_snapshot!(query("limit", &directive(Style::DeepObject, true), &scalar), @"limit=42");
        let empty = ParameterItems::new();
        check!(query_entries("limit", &directive(Style::Form, false), &empty).is_empty());
    }

    #[test]
    fn header_values() {
        let array = items(&[(&[Key::Element], &["3", "4", "5"])]);
        let object = items(&[
            (&[Key::field("role")], &["admin"]),
            (&[Key::field("firstName")], &["Alex"]),
        ]);

        check!(header_value(false, &array).as_deref() == Some("3,4,5"));
        check!(header_value(true, &array).as_deref() == Some("3,4,5"));
        check!(header_value(false, &object).as_deref() == Some("role,admin,firstName,Alex"));
        check!(header_value(true, &object).as_deref() == Some("role=admin,firstName=Alex"));
        check!(header_value(false, &ParameterItems::new()).is_none());
    }

    #[test]
    fn cookie_entries() {
        let array = items(&[(&[Key::Element], &["3", "4"])]);
        let cookie = EncodingDirective::new("id", Location::Cookie);

        check!(cookie_pairs("id", &cookie, &array) == ["id=3", "id=4"]);
        check!(cookie_pairs("id", &cookie.clone().with_explode(false), &array) == ["id=3%2C4"]);

        let scalar = items(&[(&[], &["a b"])]);
        check!(cookie_pairs("session", &cookie, &scalar) == ["session=a%20b"]);
    }

    #[test]
    fn path_substitution() {
        let scalar = items(&[(&[], &["a b/c"])]);
        let path = substitute_path("/pets/{petId}/photos", "petId", &scalar).expect("substitute");
        check!(path == "/pets/a%20b%2Fc/photos");

        let array = items(&[(&[Key::Element], &["3", "4"])]);
        let path = substitute_path("/pets/{id}", "id", &array).expect("substitute");
        check!(path == "/pets/3,4");

        let object = items(&[(&[Key::field("role")], &["admin"])]);
        let_assert!(
            Err(Error::UnsupportedParameter { path, .. }) = substitute_path("/x/{id}", "id", &object)
        );
        check!(path == "id");
    }

    #[test]
    fn allow_reserved_passthrough() {
        let reserved = ":/?#[]@!$&'()*+,;=";

        let mut escaped = QueryString::new();
        escaped.append("q", reserved, false);
        assert_snapshot!(escaped.as_str(), @"q=%3A%2F%3F%23%5B%5D%40%21%24%26%27%28%29%2A%2B%2C%3B%3D");

        let mut verbatim = QueryString::new();
        verbatim.append("q", reserved, true);
        check!(verbatim.as_str() == format!("q={reserved}"));
    }

    #[test]
    fn query_string_escapes_delimiters() {
        let mut query = QueryString::new();
        query.extend(
            query_entries(
                "id",
                &directive(Style::SpaceDelimited, false),
                &items(&[(&[Key::Element], &["3", "4"])]),
            ),
            false,
        );
        query.extend(
            query_entries(
                "filter",
                &directive(Style::DeepObject, true),
                &items(&[(&[Key::field("name")], &["café"])]),
            ),
            false,
        );
        query.append("api_key", "secret", false);
        assert_snapshot!(query.as_str(), @"id=3%204&filter%5Bname%5D=caf%C3%A9&api_key=secret");
    }
}
