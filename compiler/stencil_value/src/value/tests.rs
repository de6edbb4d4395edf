use super::*;

#[derive(Debug)]
struct Shelf {
    books: Vec<&'static str>,
}

impl Object for Shelf {
    fn type_name(&self) -> &str {
        "Shelf"
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            "count" => Some(Value::from(self.books.len() as u64)),
            _ => None,
        }
    }

    fn items(&self) -> Option<Vec<Value>> {
        Some(self.books.iter().map(|b| Value::from(*b)).collect())
    }
}

#[derive(Debug)]
struct Opaque;

impl Object for Opaque {
    fn type_name(&self) -> &str {
        "Opaque"
    }

    fn member(&self, _name: &str) -> Option<Value> {
        None
    }
}

mod truthiness {
    use super::*;

    #[test]
    fn null_and_false_are_false() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
    }

    #[test]
    fn zero_of_every_width_is_false() {
        let zeros = [
            Value::I8(0),
            Value::I16(0),
            Value::I32(0),
            Value::I64(0),
            Value::U8(0),
            Value::U16(0),
            Value::U32(0),
            Value::U64(0),
            Value::F32(0.0),
            Value::F64(0.0),
            Value::Decimal(Decimal::ZERO),
            Value::Char('\0'),
        ];
        for zero in &zeros {
            assert!(!zero.is_truthy(), "{zero:?} should be false");
        }
        assert!(Value::I8(-1).is_truthy());
        assert!(Value::F64(0.5).is_truthy());
        assert!(Value::Decimal(Decimal::ONE).is_truthy());
        assert!(Value::Char('a').is_truthy());
    }

    #[test]
    fn empty_enumerables_are_false() {
        assert!(!Value::string("").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(!Value::map(IndexMap::new()).is_truthy());
        assert!(!Value::object(Shelf { books: vec![] }).is_truthy());

        assert!(Value::string(" ").is_truthy());
        assert!(Value::list(vec![Value::Null]).is_truthy());
        assert!(Value::object(Shelf { books: vec!["Dune"] }).is_truthy());
    }

    #[test]
    fn non_enumerable_object_is_true() {
        assert!(Value::object(Opaque).is_truthy());
    }
}

mod items {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_enumerates_chars() {
        assert_eq!(
            Value::string("ab").items(),
            Some(vec![Value::Char('a'), Value::Char('b')])
        );
    }

    #[test]
    fn map_enumerates_entries_in_order() {
        let map = Value::map_from([("z", Value::I64(1)), ("a", Value::I64(2))]);
        let entries = map.items().unwrap_or_default();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            Value::map_from([("key", Value::string("z")), ("value", Value::I64(1))])
        );
    }

    #[test]
    fn scalars_are_not_enumerable() {
        assert_eq!(Value::I64(3).items(), None);
        assert_eq!(Value::Null.items(), None);
        assert_eq!(Value::object(Opaque).items(), None);
    }

    #[test]
    fn object_enumerates_its_items() {
        let shelf = Value::object(Shelf {
            books: vec!["Dune", "Emma"],
        });
        assert_eq!(
            shelf.items(),
            Some(vec![Value::string("Dune"), Value::string("Emma")])
        );
    }
}

mod display {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn null_renders_empty() {
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(Value::I32(-7).to_string(), "-7");
        assert_eq!(Value::F64(2.5).to_string(), "2.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Char('x').to_string(), "x");
        assert_eq!(Value::string("plain").to_string(), "plain");
    }

    #[test]
    fn datetime_uses_render_format() {
        let dt = NaiveDateTime::parse_from_str("2024-03-01 08:30:00", DATETIME_FORMAT);
        assert_eq!(dt.map(|dt| Value::from(dt).to_string()).ok().as_deref(), Some("2024-03-01 08:30:00"));
    }

    #[test]
    fn collections_render_nested() {
        let v = Value::map_from([(
            "tags",
            Value::list(vec![Value::string("a"), Value::I64(1)]),
        )]);
        assert_eq!(v.to_string(), "{tags: [a, 1]}");
    }
}

mod conversions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(4u8)), Value::U8(4));
    }

    #[test]
    fn json_numbers_pick_narrowest_variant() {
        let json = serde_json::json!({
            "small": 3,
            "huge": u64::MAX,
            "ratio": 0.25,
            "names": ["a"],
        });
        let value = Value::from(json);
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(entries.get("small"), Some(&Value::I64(3)));
        assert_eq!(entries.get("huge"), Some(&Value::U64(u64::MAX)));
        assert_eq!(entries.get("ratio"), Some(&Value::F64(0.25)));
        assert_eq!(
            entries.get("names"),
            Some(&Value::list(vec![Value::string("a")]))
        );
    }

    #[test]
    fn widths_are_distinct() {
        assert_ne!(Value::from(1i32), Value::from(1i64));
        assert_eq!(Value::from(1i32).type_name(), "i32");
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(Opaque);
        let b = Value::object(Opaque);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.type_name(), "Opaque");
    }
}
