use super::*;

// =============================================================
// RedirectTarget::parse
// =============================================================

#[test]
fn bare_host_is_opened_over_http() {
    let target = RedirectTarget::parse("example.com/news").expect("target");
    assert_eq!(target.as_str(), "http://example.com/news");
}

#[test]
fn bare_host_gains_root_path() {
    let target = RedirectTarget::parse("example.com").expect("target");
    assert_eq!(target.as_str(), "http://example.com/");
}

#[test]
fn explicit_https_url_is_kept() {
    let target = RedirectTarget::parse("https://example.com/a?b=1").expect("target");
    assert_eq!(target.url().scheme(), "https");
    assert_eq!(target.as_str(), "https://example.com/a?b=1");
}

#[test]
fn bare_host_with_url_in_query_is_opened_over_http() {
    let target = RedirectTarget::parse("www.google.com/url?q=https://example.org").expect("target");
    assert_eq!(target.url().host_str(), Some("www.google.com"));
    assert_eq!(target.as_str(), "http://www.google.com/url?q=https://example.org");
}

#[test]
fn host_with_port_is_accepted() {
    let target = RedirectTarget::parse("intranet.lan:8080/wiki").expect("target");
    assert_eq!(target.url().port(), Some(8080));
}

#[test]
fn non_http_schemes_are_rejected() {
    assert!(RedirectTarget::parse("ftp://files.example.com/").is_none());
    assert!(RedirectTarget::parse("javascript:alert(1)").is_none());
    assert!(RedirectTarget::parse("file:///etc/passwd").is_none());
}

#[test]
fn blank_value_is_rejected() {
    assert!(RedirectTarget::parse("").is_none());
    assert!(RedirectTarget::parse("   ").is_none());
}

// =============================================================
// resolve_redirect_target
// =============================================================

#[test]
fn reads_redir_parameter() {
    let target = resolve_redirect_target("?redir=example.com%2Fnews").expect("target");
    assert_eq!(target.as_str(), "http://example.com/news");
}

#[test]
fn leading_question_mark_is_optional() {
    assert_eq!(resolve_redirect_target("redir=example.com"), resolve_redirect_target("?redir=example.com"));
}

#[test]
fn percent_encoded_full_url() {
    let target = resolve_redirect_target("redir=http%3A%2F%2Fexample.com%2Fa%3Fb%3D1").expect("target");
    assert_eq!(target.as_str(), "http://example.com/a?b=1");
}

#[test]
fn encoded_bare_host_with_nested_url() {
    let target = resolve_redirect_target("redir=www.google.com%2Furl%3Fq%3Dhttps%3A%2F%2Fexample.org").expect("target");
    assert_eq!(target.as_str(), "http://www.google.com/url?q=https://example.org");
}

#[test]
fn alias_used_when_canonical_missing() {
    let target = resolve_redirect_target("zone=guest&redirurl=example.org").expect("target");
    assert_eq!(target.as_str(), "http://example.org/");
}

#[test]
fn canonical_wins_over_alias_in_any_order() {
    let target = resolve_redirect_target("redirurl=alias.example&redir=canonical.example").expect("target");
    assert_eq!(target.url().host_str(), Some("canonical.example"));
}

#[test]
fn empty_canonical_falls_back_to_alias() {
    let target = resolve_redirect_target("redir=&redirurl=alias.example").expect("target");
    assert_eq!(target.url().host_str(), Some("alias.example"));
}

#[test]
fn missing_parameter_yields_none() {
    assert!(resolve_redirect_target("").is_none());
    assert!(resolve_redirect_target("?zone=guest").is_none());
}

#[test]
fn unusable_value_yields_none() {
    assert!(resolve_redirect_target("redir=javascript%3Aalert(1)").is_none());
}

#[test]
fn resolves_from_full_page_url() {
    let page = Url::parse("http://10.0.0.1:8000/index.html?zone=guest&redir=example.com%2Fhome").unwrap();
    let target = resolve_from_page_url(&page).expect("target");
    assert_eq!(target.as_str(), "http://example.com/home");

    let bare = Url::parse("http://10.0.0.1:8000/index.html").unwrap();
    assert!(resolve_from_page_url(&bare).is_none());
}
