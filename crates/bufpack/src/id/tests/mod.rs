use super::*;

#[test]
fn empty() {
    let res = PackageName::try_from("");
    assert!(res == Err(PackageError::Empty));
}

#[test]
fn empty_segments() {
    for name in [".foo", "foo.", "foo..bar", "."] {
        assert_eq!(
            PackageName::try_from(name),
            Err(PackageError::EmptySegment(name.into())),
            "Expected '{}' to have an empty segment",
            name
        );
    }
}

#[test]
fn invalid_start() {
    let assert = |s: &str, c: char| {
        let res = PackageName::try_from(s);
        assert_eq!(res, Err(PackageError::InvalidStart(c)));
    };
    assert("9foo", '9');
    assert("_foo", '_');
    assert("foo.1bar", '1');
    assert("foo.bar._v1", '_');
}

#[test]
fn invalid_chars() {
    let res = PackageName::try_from("foo-bar.v1/beta");
    assert_eq!(res, Err(PackageError::InvalidCharacters("-/".into())));

    let res = PackageName::try_from("café.v1");
    assert_eq!(res, Err(PackageError::InvalidCharacters("é".into())));

    let res = PackageName::try_from("foo bar");
    assert_eq!(res, Err(PackageError::InvalidCharacters(" ".into())));
}

#[test]
fn valid_names() {
    let valid = [
        "foo",
        "mypackage.v1",
        "foo.bar.v1",
        "google.protobuf",
        "Acme.Billing_Service.V2alpha1",
        "a.b.c.d.e.f",
    ];

    for name in valid {
        assert!(
            PackageName::try_from(name).is_ok(),
            "Expected '{}' to be valid",
            name
        );
    }
}

#[test]
fn path_replaces_every_separator() -> Result<(), PackageError> {
    for name in ["foo", "mypackage.v1", "foo.bar.v1", "a.b.c.d.e.f"] {
        let dots = name.matches('.').count();
        let path = PackageName::try_from(name)?.path();

        assert_eq!(path.matches('/').count(), dots, "separators in '{}'", path);
        assert!(!path.contains('.'), "dots left in '{}'", path);
    }
    Ok(())
}

#[test]
fn path_and_display() -> Result<(), PackageError> {
    let name: PackageName = "foo.bar.v1".parse()?;
    assert_eq!(name.path(), "foo/bar/v1");
    assert_eq!(name.to_string(), "foo.bar.v1");
    Ok(())
}

#[test]
fn source_root() -> Result<(), PackageError> {
    assert_eq!(PackageName::try_from("mypackage.v1")?.source_root(), "mypackage");
    assert_eq!(PackageName::try_from("foo.bar.v1")?.source_root(), "foo/bar");
    assert_eq!(PackageName::try_from("foo")?.source_root(), "foo");
    Ok(())
}
