use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::*;
use crate::engine::test::Recorder;

fn context_with_protos() -> Result<TempDir, anyhow::Error> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("protos/foo/bar/v1"))?;
    fs::write(
        dir.path().join("protos/foo/bar/v1/bar.proto"),
        "syntax = \"proto3\";\npackage foo.bar.v1;\n",
    )?;
    Ok(dir)
}

fn request(protos: impl Into<PathBuf>) -> Result<PublishRequest, anyhow::Error> {
    Ok(PublishRequest {
        registry: "example.com/reg".parse()?,
        package: "foo.bar.v1".parse()?,
        protos: protos.into(),
        tag: Tag::latest(),
    })
}

fn dockerfile_exists(dir: &Path) -> bool {
    dir.join(PUBLISH_DOCKERFILE).exists()
}

#[tokio::test]
async fn publish_package() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let engine = Recorder::new();

    let image = publish(&engine, dir.path(), &request("protos")?).await?;
    assert_eq!(image.to_string(), "example.com/reg/foo/bar/v1:latest");

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].dir, dir.path());
    assert_eq!(
        calls[0].args,
        [
            "buildx",
            "build",
            "--push",
            "-t",
            "example.com/reg/foo/bar/v1:latest",
            "--build-arg",
            "PROTOS_DIR=protos",
            "--build-arg",
            "PACKAGE_DIR=foo/bar/v1",
            "-f",
            "Dockerfile.proto_pub",
            ".",
        ]
    );
    assert_eq!(calls[0].dockerfile.as_deref(), Some(dockerfile::publish().as_str()));
    assert!(!dockerfile_exists(dir.path()));
    Ok(())
}

#[tokio::test]
async fn dockerfile_removed_when_build_fails() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let engine = Recorder::new().failing("build");

    let res = publish(&engine, dir.path(), &request("protos")?).await;

    assert!(matches!(res, Err(Error::Publish(_))));
    assert!(engine.calls()[0].dockerfile.is_some());
    assert!(!dockerfile_exists(dir.path()));
    Ok(())
}

#[tokio::test]
async fn publish_with_tag() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let engine = Recorder::new();
    let mut request = request("protos")?;
    request.tag = "v1.2.0".parse()?;

    let image = publish(&engine, dir.path(), &request).await?;
    assert_eq!(image.to_string(), "example.com/reg/foo/bar/v1:v1.2.0");
    assert!(engine.calls()[0]
        .args
        .contains(&"example.com/reg/foo/bar/v1:v1.2.0".to_string()));
    Ok(())
}

#[tokio::test]
async fn absolute_protos_dir_is_made_relative() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let engine = Recorder::new();
    let protos = dir.path().join("protos/./foo/../foo");

    publish(&engine, dir.path(), &request(protos)?).await?;

    assert!(engine.calls()[0]
        .args
        .contains(&"PROTOS_DIR=protos/foo".to_string()));
    Ok(())
}

#[tokio::test]
async fn context_as_protos_dir() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let engine = Recorder::new();

    publish(&engine, dir.path(), &request(".")?).await?;

    assert!(engine.calls()[0]
        .args
        .contains(&"PROTOS_DIR=.".to_string()));
    Ok(())
}

#[tokio::test]
async fn missing_protos_dir() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let engine = Recorder::new();

    let err = publish(&engine, dir.path(), &request("protos")?)
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("publish should fail"))?;

    assert!(err.is_precondition());
    assert!(matches!(err, Error::MissingProtos(_)));
    assert!(engine.calls().is_empty());
    assert!(!dockerfile_exists(dir.path()));
    Ok(())
}

#[tokio::test]
async fn protos_outside_context() -> Result<(), anyhow::Error> {
    let dir = context_with_protos()?;
    let outside = tempfile::tempdir()?;
    let engine = Recorder::new();

    let err = publish(&engine, dir.path(), &request(outside.path())?)
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("publish should fail"))?;

    assert!(matches!(err, Error::ProtosOutsideContext { .. }));
    assert!(engine.calls().is_empty());
    assert!(!dockerfile_exists(dir.path()));
    Ok(())
}
