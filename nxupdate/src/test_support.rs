//! Shared test fixtures: socket helpers and ZIP builders.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use std::time::Duration;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// URL of a one-shot server that announces `content_length` bytes, sends
/// `head` of them and then holds the connection open for `hold`.
///
/// Mock servers only send complete bodies, so a mid-body stall needs a raw socket.
pub(crate) fn stalled_body_url(content_length: usize, head: &'static [u8], hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = [0u8; 1024];
        stream.read(&mut request).ok();

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            content_length
        );
        stream.write_all(response.as_bytes()).ok();
        stream.write_all(head).ok();
        stream.flush().ok();
        thread::sleep(hold);
    });

    format!("http://{}/all_patches.zip", addr)
}

/// URL pointing at a local port with nothing listening.
pub(crate) fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/all_patches.zip", addr)
}

/// Entry to place into a fixture archive.
pub(crate) enum FixtureEntry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

/// Write a deflate-compressed ZIP archive with the given entries, in order.
pub(crate) fn write_zip(path: &Path, entries: &[FixtureEntry<'_>]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        match entry {
            FixtureEntry::File(name, contents) => {
                zip.start_file(*name, options).unwrap();
                zip.write_all(contents).unwrap();
            }
            FixtureEntry::Dir(name) => {
                zip.add_directory(*name, options).unwrap();
            }
        }
    }

    zip.finish().unwrap();
}
