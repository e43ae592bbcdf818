use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use httper::http::{Client, Method, Protocol, RequestBody};
use httper::parser::splitter::split_blocks;
use httper::parser::{self, ParseError};
use httper::variable::Environment;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn parse(content: &str) -> parser::ParsedDocument {
    parser::parse_document(content, &Environment::new(), Path::new("."))
}

#[rstest]
#[case("GET https://h/a", 1)]
#[case("GET https://h/a\n###\nGET https://h/b", 2)]
#[case("###\n###\n###", 4)]
#[case("### one\n\n### two\n### three\nGET https://h/", 4)]
fn test_marker_lines_yield_one_more_block(#[case] content: &str, #[case] expected: usize) {
    assert_eq!(split_blocks(content).count(), expected);
}

#[test]
fn test_bearer_scenario() {
    let document = parse("GET https://localhost:8080/bearer\nAuthorization: Bearer 42069\n");

    assert_eq!(document.requests.len(), 1);
    let request = &document.requests[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url.as_str(), "https://localhost:8080/bearer");
    assert_eq!(request.headers["authorization"], "Bearer 42069");
}

#[test]
fn test_whitespace_only_middle_block() {
    let document = parse("GET https://h/1\n###\n \t \n\n###\nPOST https://h/3\n");
    assert_eq!(document.requests.len(), 2);
    assert!(document.is_ok());
}

#[rstest]
#[case("GET https://h/p HTTP/2")]
#[case("https://h/p GET HTTP/2")]
#[case("HTTP/2 https://h/p GET")]
fn test_essentials_order_insensitive(#[case] line: &str) {
    let document = parse(line);
    let request = &document.requests[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url.as_str(), "https://h/p");
    assert_eq!(request.protocol, Some(Protocol::Http2));
}

#[test]
fn test_basic_credentials_decode() {
    let mut requests = parser::parse_request(
        "GET https://h/basic\nAuthorization: Basic alice secret",
        &Environment::new(),
        Path::new("."),
    )
    .unwrap();

    let built = Client::new().unwrap().build(requests.remove(0)).unwrap();
    let values: Vec<_> = built.headers().get_all("authorization").iter().collect();
    assert_eq!(values.len(), 1);

    let encoded = values[0].to_str().unwrap().strip_prefix("Basic ").unwrap();
    let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!(decoded, "alice:secret");
}

#[test]
fn test_missing_content_type_means_no_body() {
    let document = parse("POST https://h/echo\nX-Trace: 1\n\n{\"ignored\": true}");
    assert!(document.requests[0].body.is_none());
}

#[tokio::test]
async fn test_multipart_round_trip() {
    let dir = TempDir::new().unwrap();
    let image: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0, 0, 0xff, b'\r', b'\n', 0x1a, b'\n', 0];
    fs::write(dir.path().join("file.bin"), &image).unwrap();
    fs::write(dir.path().join("notes.txt"), "line one").unwrap();

    let content = r#"POST https://h/upload
Content-Type: multipart/form-data; boundary="----Boundary42"

------Boundary42
Content-Disposition: form-data; name="title"

test text
------Boundary42
Content-Disposition: form-data; name="image"; filename="file.bin"
Content-Type: image/png

< file.bin
------Boundary42
Content-Disposition: form-data; name="bundle"; filename="bundle.txt"

< notes.txt
< file.bin
------Boundary42--"#;

    let mut requests = parser::parse_request(content, &Environment::new(), dir.path()).unwrap();
    let body = requests.remove(0).body.unwrap();
    let RequestBody::Multipart(multipart) = &body else {
        panic!("Expected multipart body, got {body:?}");
    };
    assert_eq!(multipart.boundary(), "----Boundary42");

    let length = body.content_length();
    let bytes = body.collect().await.unwrap();
    assert_eq!(bytes.len() as u64, length);

    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(bytes) });
    let mut reader = multer::Multipart::new(stream, "----Boundary42");

    let title = reader.next_field().await.unwrap().unwrap();
    assert_eq!(title.name(), Some("title"));
    assert_eq!(title.file_name(), None);
    assert_eq!(title.text().await.unwrap(), "test text");

    let field = reader.next_field().await.unwrap().unwrap();
    assert_eq!(field.name(), Some("image"));
    assert_eq!(field.file_name(), Some("file.bin"));
    assert_eq!(field.content_type().map(|m| m.essence_str()), Some("image/png"));
    assert_eq!(field.bytes().await.unwrap().as_ref(), image.as_slice());

    let bundle = reader.next_field().await.unwrap().unwrap();
    assert_eq!(bundle.file_name(), Some("bundle.txt"));
    let mut expected = b"line one\n".to_vec();
    expected.extend_from_slice(&image);
    assert_eq!(bundle.bytes().await.unwrap().as_ref(), expected.as_slice());

    assert!(reader.next_field().await.unwrap().is_none());
}

#[test]
fn test_missing_attachment_fails_only_its_block() {
    let dir = TempDir::new().unwrap();
    let content = "GET https://h/ok\n###\nPOST https://h/upload\nContent-Type: multipart/form-data; boundary=b\n\n--b\nContent-Disposition: form-data; name=\"f\"; filename=\"gone.bin\"\n\n< gone.bin\n--b--\n###\nGET https://h/also-ok";

    let document = parser::parse_document(content, &Environment::new(), dir.path());
    assert_eq!(document.requests.len(), 2);

    let failure = document.failure(2).unwrap();
    assert!(failure.error.is_io());
    match &failure.error {
        ParseError::Attachment { path, .. } => assert_eq!(path, &dir.path().join("gone.bin")),
        other => panic!("Expected attachment error, got {other:?}"),
    }

    let err: httper::HttperError = parser::parse_request(content, &Environment::new(), dir.path())
        .unwrap_err()
        .into();
    assert!(matches!(err, httper::HttperError::IoError(_)));
    assert!(err.to_string().contains("gone.bin"));
}
