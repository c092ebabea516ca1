#![allow(dead_code)]

use pawtraits_core::{AppConfig, AppState};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

pub struct TestApp {
    pub state: AppState,
    pub content_dir: TempDir,
    pub data_dir: TempDir,
}

/// 最小構成の PNG（シグネチャと IHDR チャンクのみ）
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.extend_from_slice(&[0, 0, 0, 0]);
    data
}

fn post_json(id: &str, number_of_comments: u32) -> serde_json::Value {
    json!({
        "id": id,
        "createdAt": "2023-07-31T12:00:00Z",
        "imageName": format!("{id}.png"),
        "thumbnailName": format!("{id}-thumbnail.png"),
        "description": format!("Post {id}"),
        "blurHash": "LEHV6nWB2yk8pyo0adR*.7kCMdnj",
        "imageSize": [640, 480],
        "thumbnailSize": [320, 240],
        "author": { "id": "yoshi", "name": "Yoshi", "username": "yoshi" },
        "numberOfComments": number_of_comments
    })
}

/// posts.json・詳細・画像を含むコンテンツディレクトリを作成する
pub fn write_content(dir: &Path) {
    let posts = json!({
        "posts": [post_json("IMG_2826", 2), post_json("IMG_3001", 1), post_json("p1", 3)]
    });
    std::fs::write(dir.join("posts.json"), posts.to_string()).unwrap();

    let details = json!({
        "comments": [
            { "id": "c1", "username": "mario", "text": "So fluffy" },
            { "id": "c2", "username": "luigi", "text": "Good dog" }
        ]
    });
    std::fs::write(dir.join("details-IMG_2826.json"), details.to_string()).unwrap();
    std::fs::write(
        dir.join("details-IMG_3001.json"),
        json!({ "comments": [{ "id": "c3", "username": "peach", "text": "Aww" }] }).to_string(),
    )
    .unwrap();

    std::fs::write(dir.join("IMG_2826.png"), png_bytes(640, 480)).unwrap();
    std::fs::write(dir.join("IMG_2826-thumbnail.png"), png_bytes(320, 240)).unwrap();
    std::fs::write(dir.join("IMG_3001.png"), b"definitely not a png").unwrap();
    std::fs::write(dir.join("yoshi.heic"), png_bytes(64, 64)).unwrap();
}

pub fn config_for(content_dir: &Path, data_dir: &Path, delays: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.content.content_dir = content_dir.to_path_buf();
    config.storage.data_dir = data_dir.to_path_buf();
    config.latency.enabled = delays;
    config
}

pub async fn setup_app(delays: bool) -> TestApp {
    let content_dir = TempDir::new().unwrap();
    let data_dir = TempDir::new().unwrap();
    write_content(content_dir.path());

    let state = AppState::initialize(config_for(content_dir.path(), data_dir.path(), delays))
        .await
        .unwrap();

    TestApp {
        state,
        content_dir,
        data_dir,
    }
}
