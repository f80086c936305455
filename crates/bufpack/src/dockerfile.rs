//! Dockerfile templates for the two image kinds.
//!
//! Both images keep their content under `/workspace` and use `buf` as the
//! entrypoint. Publishing is parameterized through build arguments, while the
//! generation image bakes in the published image it derives from.
use crate::reference::ImageRef;

/// Image providing the `buf` CLI that package images are built on.
pub const BUF_IMAGE: &str = "bufbuild/buf:latest";

/// Build argument naming the proto sources, relative to the build context.
pub const PROTOS_DIR_ARG: &str = "PROTOS_DIR";
/// Build argument naming where the sources land inside the image.
pub const PACKAGE_DIR_ARG: &str = "PACKAGE_DIR";

/// Config file `buf generate` reads; copied into the generation image.
pub const GEN_CONFIG: &str = "buf.gen.yaml";

/// Directory extracted from generation containers.
pub const WORKSPACE: &str = "/workspace";

/// Renders the Dockerfile for a package image. The build fails unless the
/// copied sources pass `buf lint`.
pub fn publish() -> String {
    format!(
        r#"FROM {BUF_IMAGE}

ARG {PROTOS_DIR_ARG}
ARG {PACKAGE_DIR_ARG}

WORKDIR {WORKSPACE}

COPY ${PROTOS_DIR_ARG} ${PACKAGE_DIR_ARG}

RUN /usr/local/bin/buf lint

ENTRYPOINT [ "/usr/local/bin/buf" ]
"#
    )
}

/// Renders the Dockerfile for a generation image on top of `base`.
///
/// Generation runs at build time. The config and the package sources under
/// `source_root` are deleted in the same layer, so `/workspace` ends up
/// holding only generated code.
pub fn generate(base: &ImageRef, source_root: &str) -> String {
    format!(
        r#"FROM {base}

WORKDIR {WORKSPACE}

COPY {GEN_CONFIG} {GEN_CONFIG}

RUN /usr/local/bin/buf generate && rm {GEN_CONFIG} && rm -r {source_root}

ENTRYPOINT [ "/usr/local/bin/buf" ]
"#
    )
}
