//! Request URI composition: endpoint + resource + identifier + parameters.
//!
//! # Design
//! Path segments are joined with exactly one `/`. Matrix parameters are
//! appended to the final path segment as `;name=value` pairs and query
//! parameters replace the endpoint's query string. Names and values are
//! percent-encoded with the RFC 3986 data-string rules, so only unreserved
//! characters (`A-Z a-z 0-9 - . _ ~`) pass through unchanged.
//!
//! The `url` crate drops a port equal to the scheme default (80 for http,
//! 443 for https) when the endpoint is parsed, so rendered URIs never carry
//! it.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::parameter::{Parameter, ParameterKind};

const QUERY_STRING_DELIMITER: &str = "&";
const MATRIX_DELIMITER: &str = ";";
const SEPARATORS: &[char] = &['/', '\\'];

/// Everything except RFC 3986 unreserved characters.
const DATA_STRING: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `input` as an RFC 3986 data string.
pub fn encode_data(input: &str) -> String {
    utf8_percent_encode(input, DATA_STRING).to_string()
}

/// Build the final request URI.
///
/// `resource` and `identifier` are appended as path segments when present and
/// non-blank. Parameters of kind `RequestBody` never appear in the URI. When
/// `omit_empty` is set, parameters whose value is missing or blank are dropped.
pub fn build_uri(
    endpoint: &Url,
    resource: Option<&str>,
    identifier: Option<&str>,
    parameters: &[Parameter],
    omit_empty: bool,
) -> Url {
    let mut uri = endpoint.clone();

    let mut path = path_combine(endpoint.path(), resource.unwrap_or_default());
    path = path_combine(&path, identifier.unwrap_or_default());

    let matrix = encode_parameters(parameters, ParameterKind::Matrix, omit_empty, MATRIX_DELIMITER);
    if let Some(matrix) = matrix {
        path.push_str(MATRIX_DELIMITER);
        path.push_str(&matrix);
    }
    uri.set_path(&path);

    let query = encode_parameters(
        parameters,
        ParameterKind::QueryString,
        omit_empty,
        QUERY_STRING_DELIMITER,
    );
    if let Some(query) = query {
        uri.set_query(Some(&query));
    }

    uri
}

/// Join two path fragments with a single `/`. A blank fragment is skipped;
/// otherwise only `/` and `\` are trimmed, whitespace is kept.
fn path_combine(left: &str, right: &str) -> String {
    let right = right.trim_matches(SEPARATORS);
    if right.trim().is_empty() {
        return left.to_string();
    }
    if left.trim().is_empty() {
        return right.to_string();
    }
    format!("{}/{}", left.trim_end_matches(SEPARATORS), right)
}

/// Encode every parameter of `kind` as `name=value` joined by `delimiter`.
/// Returns `None` when no parameter of that kind survives filtering.
fn encode_parameters(
    parameters: &[Parameter],
    kind: ParameterKind,
    omit_empty: bool,
    delimiter: &str,
) -> Option<String> {
    let encoded: Vec<String> = parameters
        .iter()
        .filter(|p| p.kind() == kind)
        .filter(|p| !omit_empty || !p.is_empty())
        .map(encode_parameter)
        .collect();

    if encoded.is_empty() {
        None
    } else {
        Some(encoded.join(delimiter))
    }
}

fn encode_parameter(parameter: &Parameter) -> String {
    match parameter.value() {
        Some(value) => format!("{}={}", encode_data(parameter.name()), encode_data(value)),
        None => format!("{}=", encode_data(parameter.name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn resource_and_identifier_are_joined_with_single_slashes() {
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("resource"), Some("1"), &[], true);
        assert_eq!(uri.as_str(), "http://endpoint.com/resource/1");
    }

    #[test]
    fn separators_around_segments_are_trimmed() {
        let uri = build_uri(
            &endpoint("http://endpoint.com/api/"),
            Some("/customers/"),
            Some("/7"),
            &[],
            true,
        );
        assert_eq!(uri.as_str(), "http://endpoint.com/api/customers/7");
    }

    #[test]
    fn whitespace_inside_segments_is_kept() {
        let uri = build_uri(
            &endpoint("http://endpoint.com"),
            Some(" customers/"),
            Some("  "),
            &[],
            true,
        );
        assert_eq!(uri.as_str(), "http://endpoint.com/%20customers");
    }

    #[test]
    fn reserved_path_characters_are_escaped_by_the_url() {
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("a?b"), Some("x#y"), &[], true);
        assert_eq!(uri.as_str(), "http://endpoint.com/a%3Fb/x%23y");
        assert_eq!(uri.query(), None);
        assert_eq!(uri.fragment(), None);
    }

    #[test]
    fn missing_identifier_adds_no_trailing_segment() {
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("resource"), None, &[], true);
        assert_eq!(uri.as_str(), "http://endpoint.com/resource");
    }

    #[test]
    fn bare_endpoint_keeps_root_path() {
        let uri = build_uri(&endpoint("http://localhost:9001"), None, None, &[], true);
        assert_eq!(uri.as_str(), "http://localhost:9001/");
    }

    #[test]
    fn default_ports_are_dropped() {
        let http = build_uri(&endpoint("http://endpoint.com:80"), Some("r"), None, &[], true);
        assert_eq!(http.as_str(), "http://endpoint.com/r");

        let https = build_uri(&endpoint("https://endpoint.com:443"), Some("r"), None, &[], true);
        assert_eq!(https.as_str(), "https://endpoint.com/r");

        let custom = build_uri(&endpoint("https://endpoint.com:8443"), Some("r"), None, &[], true);
        assert_eq!(custom.as_str(), "https://endpoint.com:8443/r");
    }

    #[test]
    fn matrix_parameters_follow_the_path() {
        let params = vec![
            Parameter::matrix("matrixparam1", "value1"),
            Parameter::matrix("matrixparam2", "value2"),
        ];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("resource"), None, &params, true);
        assert_eq!(
            uri.as_str(),
            "http://endpoint.com/resource;matrixparam1=value1;matrixparam2=value2"
        );
    }

    #[test]
    fn empty_matrix_parameters_are_omitted() {
        let params = vec![Parameter::matrix("a", "1"), Parameter::matrix("b", "")];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("widgets"), None, &params, true);
        assert_eq!(uri.as_str(), "http://endpoint.com/widgets;a=1");
    }

    #[test]
    fn only_empty_parameters_leave_no_segment() {
        let params = vec![
            Parameter::matrix("a", ""),
            Parameter::query("b", " "),
            Parameter::new("c", None, ParameterKind::QueryString),
        ];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("widgets"), None, &params, true);
        assert_eq!(uri.as_str(), "http://endpoint.com/widgets");
    }

    #[test]
    fn empty_parameters_are_kept_when_not_omitting() {
        let params = vec![
            Parameter::query("a", ""),
            Parameter::new("b", None, ParameterKind::QueryString),
        ];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("r"), None, &params, false);
        assert_eq!(uri.as_str(), "http://endpoint.com/r?a=&b=");
    }

    #[test]
    fn query_and_matrix_parameters_combine() {
        let params = vec![
            Parameter::query("name", "Jane"),
            Parameter::matrix("v", "2"),
            Parameter::query("surname", "Wade"),
        ];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("customers"), Some("1"), &params, true);
        assert_eq!(
            uri.as_str(),
            "http://endpoint.com/customers/1;v=2?name=Jane&surname=Wade"
        );
    }

    #[test]
    fn body_parameters_never_reach_the_uri() {
        let params = vec![Parameter::request_body("application/json", "{\"a\":1}")];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("r"), None, &params, true);
        assert_eq!(uri.as_str(), "http://endpoint.com/r");
    }

    #[test]
    fn reserved_characters_are_percent_encoded() {
        let params = vec![Parameter::query("q", "a b&c=d/é~")];
        let uri = build_uri(&endpoint("http://endpoint.com"), Some("search"), None, &params, true);
        assert_eq!(
            uri.as_str(),
            "http://endpoint.com/search?q=a%20b%26c%3Dd%2F%C3%A9~"
        );
    }

    #[test]
    fn encode_data_leaves_unreserved_characters() {
        assert_eq!(encode_data("AZaz09-._~"), "AZaz09-._~");
        assert_eq!(encode_data("!*'()"), "%21%2A%27%28%29");
    }

    #[test]
    fn encode_data_handles_long_multibyte_input() {
        let input = "é".repeat(40_000);
        let encoded = encode_data(&input);
        assert_eq!(encoded, "%C3%A9".repeat(40_000));
    }
}
