#![allow(missing_docs)]

use mapbin::{Describe, MapVec};

/// Derived descriptions walk fields in declaration order - the order is
/// the on-disk layout.
#[test]
fn derive_describes_fields_in_declaration_order() -> mapbin::Result<()> {
    #[derive(Describe, Default, PartialEq, Debug)]
    struct Packet {
        kind: u16,
        body: u8,
    }

    let mut value = Packet { kind: 1, body: 5 };
    assert_eq!(mapbin::measure_size(&mut value)?, 3);

    let mut buf = [0u8; 3];
    mapbin::write_into_buffer(&mut buf, &mut value)?;
    assert_eq!(buf, [1, 0, 5]);

    let back: Packet = mapbin::read_from_buffer(&buf)?;
    assert_eq!(back, value);
    Ok(())
}

#[test]
fn derive_supports_tuple_structs() -> mapbin::Result<()> {
    #[derive(Describe, Default, PartialEq, Debug)]
    struct Pair(u64, u8);

    let mut value = Pair(10, 3);
    assert_eq!(mapbin::measure_size(&mut value)?, 9);

    let mut buf = [0u8; 9];
    mapbin::write_into_buffer(&mut buf, &mut value)?;
    let back: Pair = mapbin::read_from_buffer(&buf)?;
    assert_eq!(back, value);
    Ok(())
}

#[test]
fn derive_supports_unit_structs() -> mapbin::Result<()> {
    #[derive(Describe, Default, PartialEq, Debug)]
    struct Marker;

    assert_eq!(mapbin::measure_size(&mut Marker)?, 0);
    Ok(())
}

/// `#[mapbin(skip)]` fields take no part in serialization and keep their
/// constructor value on read.
#[test]
fn skip_attribute_excludes_field() -> mapbin::Result<()> {
    #[derive(Describe, Default, PartialEq, Debug)]
    struct Cached {
        keep: u32,
        #[mapbin(skip)]
        cache: u32,
    }

    let mut value = Cached { keep: 42, cache: 99 };
    assert_eq!(mapbin::measure_size(&mut value)?, 4);

    let mut buf = [0u8; 4];
    mapbin::write_into_buffer(&mut buf, &mut value)?;
    let back: Cached = mapbin::read_from_buffer(&buf)?;
    assert_eq!(back.keep, 42);
    assert_eq!(back.cache, 0); // default, not serialized
    Ok(())
}

/// Derived types nest: a derived struct containing strings, vectors and
/// another derived struct round-trips through both read paths.
#[test]
fn derive_nests_through_both_read_paths() -> mapbin::Result<()> {
    #[derive(Describe, Default, Clone, PartialEq, Debug)]
    struct Inner {
        id: u32,
        label: String,
    }

    #[derive(Describe, Default, Clone, PartialEq, Debug)]
    struct Outer {
        inner: Inner,
        data: MapVec<u64>,
    }

    let mut value = Outer {
        inner: Inner {
            id: 7,
            label: "node".to_string(),
        },
        data: vec![1, 2, 3].into(),
    };

    let size = mapbin::measure_size(&mut value)? as usize;
    let mut buf = vec![0u8; size];
    mapbin::write_into_buffer(&mut buf, &mut value)?;

    let copied: Outer = mapbin::read_from_buffer(&buf)?;
    assert_eq!(copied, value);

    let (mapped, _storage): (Outer, _) = mapbin::read_via_map(buf)?;
    assert_eq!(mapped, value);
    Ok(())
}
