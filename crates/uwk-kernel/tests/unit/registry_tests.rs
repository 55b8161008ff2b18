//! Tests for the resolution registry
//!
//! The registry is process-wide, so every test uses its own component
//! kinds; tests never share a kind.

use std::sync::atomic::{AtomicUsize, Ordering};

use uwk_kernel::registry::{is_registered, register, resolve};
use uwk_kernel::Error;

#[derive(Debug)]
struct RepoKindX;

#[test]
fn resolve_before_register_names_the_kind() {
    let err = resolve::<RepoKindX>().unwrap_err();
    match err {
        Error::UnregisteredKind { kind } => assert!(kind.contains("RepoKindX")),
        other => panic!("expected UnregisteredKind, got {other}"),
    }
}

#[test]
fn registered_kind_resolves_fresh_instances() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct CountingRepo {
        serial: usize,
    }

    register::<CountingRepo, _>(|| CountingRepo {
        serial: BUILT.fetch_add(1, Ordering::SeqCst),
    });

    assert!(is_registered::<CountingRepo>());
    let first = resolve::<CountingRepo>().unwrap();
    let second = resolve::<CountingRepo>().unwrap();
    // each resolve invokes the factory; no instance caching
    assert_ne!(first.serial, second.serial);
}

#[test]
fn re_registration_overwrites() {
    #[derive(Debug, PartialEq)]
    struct Flavor(&'static str);

    register::<Flavor, _>(|| Flavor("real"));
    assert_eq!(resolve::<Flavor>().unwrap(), Flavor("real"));

    // test code swapping in a mock must win
    register::<Flavor, _>(|| Flavor("mock"));
    assert_eq!(resolve::<Flavor>().unwrap(), Flavor("mock"));
}

#[test]
fn unrelated_kinds_do_not_collide() {
    struct KindA;
    struct KindB;

    register::<KindA, _>(|| KindA);
    assert!(is_registered::<KindA>());
    assert!(!is_registered::<KindB>());
    assert!(resolve::<KindB>().is_err());
}
