//! URL loading against a local HTTP server: status and content-type checks.

use docchat::error::DocChatError;
use docchat::loader::{DocumentLoader, DocumentSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one connection with a canned HTTP response, then stop.
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn non_success_status_is_source_unreadable() {
    let base = serve_once(
        "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;

    let loader = DocumentLoader::new().unwrap();
    let result = loader.load(&DocumentSource::Url(format!("{base}/missing"))).await;

    match result {
        Err(DocChatError::SourceUnreadable(message)) => {
            assert!(message.contains("404"), "message does not name the status: {message}");
        }
        other => panic!("expected SourceUnreadable, got {other:?}"),
    }
}

#[tokio::test]
async fn non_text_content_type_is_source_unreadable() {
    let base = serve_once(
        "HTTP/1.1 200 OK\r\ncontent-type: application/octet-stream\r\n\
         content-length: 4\r\nconnection: close\r\n\r\n\x00\x01\x02\x03",
    )
    .await;

    let loader = DocumentLoader::new().unwrap();
    let result = loader.load(&DocumentSource::Url(base)).await;
    assert!(matches!(result, Err(DocChatError::SourceUnreadable(_))));
}

#[tokio::test]
async fn html_page_is_loaded_and_extracted() {
    let base = serve_once(
        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\nconnection: close\r\n\r\n\
         <html><body><p>a tiny page about nothing</p></body></html>",
    )
    .await;

    let loader = DocumentLoader::new().unwrap();
    let document = loader.load(&DocumentSource::Url(base.clone())).await.unwrap();

    assert_eq!(document.text(), "a tiny page about nothing");
    assert_eq!(document.source_uri.as_deref(), Some(base.as_str()));
}
