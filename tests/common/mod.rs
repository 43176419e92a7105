#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const HOME: &str = "/search/home/";

pub fn get_test_file_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(filename)
}

pub fn read_test_file(filename: &str) -> String {
    fs::read_to_string(get_test_file_path(filename))
        .unwrap_or_else(|e| panic!("Failed to read test file {}: {}", filename, e))
}

/// One search data row: `[first, last, full, link, submitted]`.
pub fn search_row(first: &str, last: &str, path: &str, submitted: &str) -> Vec<String> {
    vec![
        first.to_string(),
        last.to_string(),
        format!("{} {}", first, last),
        format!(r#"<a href="{}" target="_blank">Report {}</a>"#, path, submitted),
        submitted.to_string(),
    ]
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Disclaimer page that sets a session cookie, plus the acceptance POST.
pub async fn mount_disclaimer(server: &MockServer, expected_posts: u64) {
    Mock::given(method("GET"))
        .and(path(HOME))
        .respond_with(
            html(read_test_file("home.html")).insert_header("set-cookie", "sessionid=s1; Path=/"),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(HOME))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("referer", format!("{}{}", server.uri(), HOME).as_str()))
        .and(body_string_contains("prohibition_agreement=1"))
        .and(body_string_contains("csrfmiddlewaretoken=server-issued-token-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(expected_posts)
        .mount(server)
        .await;
}
