use chrono::NaiveDate;

use super::*;
use crate::options::{BodyStyle, DefaultValue, HeaderRowNumber, ResourceReadingPolicy};
use crate::value::Value;
use crate::write::StyleRef;

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    id: i32,
    name: String,
    born: Option<NaiveDate>,
}

impl Resource for Person {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::from_default(),
            Constructor::new(|(id, name, born): (i32, String, Option<NaiveDate>)| Person {
                id,
                name,
                born,
            }),
            Constructor::new(|(name, id): (String, i32)| Person {
                id,
                name,
                born: None,
            }),
        ]
    }
}

fn with_setters(builder: &mut ResourceMapBuilder<Person>) -> Result<()> {
    builder
        .property("id", |p: &Person| &p.id)?
        .setter(|p, id| p.id = id);
    builder
        .property("name", |p: &Person| &p.name)?
        .setter(|p, name| p.name = name);
    builder
        .property("born", |p: &Person| &p.born)?
        .setter(|p, born| p.born = born);
    Ok(())
}

#[test]
fn test_build_with_setters() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    with_setters(&mut builder).unwrap();
    let map = builder.build().unwrap();

    assert_eq!(map.resource_name(), "Person");
    assert_eq!(map.header_row_number(), 1);
    assert_eq!(map.reading_policy(), ResourceReadingPolicy::ContinueOnFailure);
    assert!(matches!(map.plan(), ConstructionPlan::PropertySetters { .. }));

    let key = map.properties()[1].key();
    assert_eq!(key.name(), Some("name"));
    assert_eq!(key.number(), None);

    let person = map
        .construct(vec![Some(Value::Integer(3)), Some(Value::from("Cy")), None])
        .unwrap();
    assert_eq!(
        person,
        Person {
            id: 3,
            name: "Cy".into(),
            born: None
        }
    );
}

#[test]
fn test_contract_violations_are_immediate() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder.property("id", |p: &Person| &p.id).unwrap();

    assert!(matches!(
        builder.property("id", |p: &Person| &p.id),
        Err(Error::InvalidArgument(_))
    ));
    assert!(builder.property("", |p: &Person| &p.name).is_err());
    assert!(builder.header_row(0).is_err());
    assert!(
        builder
            .property("name", |p: &Person| &p.name)
            .unwrap()
            .number(0)
            .is_err()
    );

    let err = builder
        .property("born", |p: &Person| &p.born)
        .unwrap()
        .registration(StringKindRegistration(StringKind::Inline))
        .err();
    assert!(matches!(err, Some(Error::ExtensionNotAllowed { .. })));
}

#[test]
fn test_try_registration_reports_instead_of_failing() -> Result<()> {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder
        .property("id", |p: &Person| &p.id)?
        .setter(|p, id| p.id = id);
    builder
        .property("name", |p: &Person| &p.name)?
        .setter(|p, name| p.name = name);
    let mut born = builder
        .property("born", |p: &Person| &p.born)?
        .setter(|p, born| p.born = born);

    assert!(!born.try_registration(StringKindRegistration(StringKind::Inline)));
    assert!(born.try_registration(DateKindRegistration(DateKind::Text)));
    assert!(!born.try_registration(DateKindRegistration(DateKind::Serial)));

    let map = builder.build().unwrap();
    let born = &map.properties()[2];
    assert_eq!(born.date_kind(), DateKind::Text);
    assert!(!born.options().has::<StringKind>());
    Ok(())
}

#[test]
fn test_resource_options_reach_the_map() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    with_setters(&mut builder).unwrap();
    builder
        .header_row(3)
        .unwrap()
        .reading_policy(ResourceReadingPolicy::ExitOnFailure);
    let map = builder.build().unwrap();

    assert_eq!(map.header_row_number(), 3);
    assert_eq!(map.options().find::<HeaderRowNumber>(), Some(&HeaderRowNumber(3)));
    assert_eq!(map.reading_policy(), ResourceReadingPolicy::ExitOnFailure);
}

#[test]
fn test_cascade_skips_disallowed_and_keeps_property_choice() -> Result<()> {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder
        .property("id", |p: &Person| &p.id)?
        .setter(|p, id| p.id = id)
        .optional(OptionalElements::BODY);
    builder
        .property("name", |p: &Person| &p.name)?
        .setter(|p, name| p.name = name);
    builder
        .property("born", |p: &Person| &p.born)?
        .setter(|p, born| p.born = born)
        .date_kind(DateKind::Serial);
    builder
        .optional(OptionalElements::ALL)
        .string_kind(StringKind::Inline)
        .date_kind(DateKind::Text)
        .body_style(StyleRef::new("body", Default::default()));

    let map = builder.build().unwrap();
    let [id, name, born] = map.properties() else {
        panic!("three properties expected");
    };

    assert!(id.is_optional(OptionalElements::BODY));
    assert!(!id.is_optional(OptionalElements::HEADER));
    assert!(name.is_optional(OptionalElements::ALL));
    assert_eq!(name.string_kind(), StringKind::Inline);
    assert!(!id.options().has::<StringKind>());
    assert!(!born.options().has::<StringKind>());
    assert_eq!(born.date_kind(), DateKind::Serial);
    assert!(!name.options().has::<DateKind>());
    assert!(id.options().has::<BodyStyle>());
    assert_eq!(id.body_style().map(StyleRef::key), Some("body"));
    Ok(())
}

#[test]
fn test_failures_are_aggregated() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder
        .property("id", |p: &Person| &p.id)
        .unwrap()
        .ignore_name()
        .default_value(0, Resolutions::empty());
    builder
        .property("name", |p: &Person| &p.name)
        .unwrap()
        .setter(|p, name| p.name = name);
    builder.property("born", |p: &Person| &p.born).unwrap();
    builder.explicit_constructor(["name", "name"]);

    let error = builder.build().unwrap_err();

    assert_eq!(error.resource, "Person");
    assert_eq!(error.conversion_failures.len(), 1);
    assert_eq!(
        error.conversion_failures[0].registration,
        "ExplicitConstructorRegistration"
    );
    assert_eq!(error.property_errors.len(), 1);
    assert_eq!(error.property_errors[0].property, "id");
    assert_eq!(error.property_errors[0].failures.len(), 2);
    assert_eq!(
        error.validation_failures,
        vec![ValidationFailure::NoMatchingConstructor {
            parameters: vec![
                std::any::type_name::<String>().to_string(),
                std::any::type_name::<String>().to_string(),
            ],
        }]
    );
    assert_eq!(error.failure_count(), 4);
}

#[test]
fn test_default_value_is_converted() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder
        .property("id", |p: &Person| &p.id)
        .unwrap()
        .setter(|p, id| p.id = id)
        .default_value(-1, Resolutions::MISSING | Resolutions::EMPTY);
    let map = builder.build().unwrap();

    assert_eq!(
        map.properties()[0].default_value(),
        Some(&DefaultValue {
            value: Value::Integer(-1),
            resolutions: Resolutions::MISSING | Resolutions::EMPTY,
        })
    );
}

#[test]
fn test_explicit_constructor_plan() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder.property("id", |p: &Person| &p.id).unwrap();
    builder.property("name", |p: &Person| &p.name).unwrap();
    builder
        .property("born", |p: &Person| &p.born)
        .unwrap()
        .setter(|p, born| p.born = born);
    builder.explicit_constructor(["name", "id"]);
    let map = builder.build().unwrap();

    match map.plan() {
        ConstructionPlan::ExplicitConstructor { parameters, .. } => {
            assert_eq!(parameters, &vec![1, 0]);
        },
        other => panic!("unexpected plan {:?}", other),
    }

    let born = NaiveDate::from_ymd_opt(1990, 5, 1).unwrap();
    let person = map
        .construct(vec![
            Some(Value::Integer(7)),
            Some(Value::from("Di")),
            Some(Value::Date(born)),
        ])
        .unwrap();
    assert_eq!(
        person,
        Person {
            id: 7,
            name: "Di".into(),
            born: Some(born)
        }
    );
}

#[test]
fn test_implicit_constructor_plan() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder.property("id", |p: &Person| &p.id).unwrap();
    builder.property("name", |p: &Person| &p.name).unwrap();
    builder.property("born", |p: &Person| &p.born).unwrap();
    builder.implicit_constructor();
    let map = builder.build().unwrap();

    assert!(matches!(map.plan(), ConstructionPlan::ImplicitConstructor { .. }));
    let person = map
        .construct(vec![Some(Value::Integer(1)), Some(Value::from("Al")), None])
        .unwrap();
    assert_eq!(person.name, "Al");
    assert_eq!(person.born, None);
}

#[test]
fn test_both_constructor_strategies_fail() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder.property("id", |p: &Person| &p.id).unwrap();
    builder.property("name", |p: &Person| &p.name).unwrap();
    builder.property("born", |p: &Person| &p.born).unwrap();
    builder.implicit_constructor().explicit_constructor(["name", "id"]);

    let error = builder.build().unwrap_err();
    assert!(
        error
            .validation_failures
            .contains(&ValidationFailure::DuplicateConstructor)
    );
}

#[test]
fn test_missing_setter_is_reported_by_name() {
    let mut builder = ResourceMapBuilder::<Person>::new();
    builder
        .property("id", |p: &Person| &p.id)
        .unwrap()
        .setter(|p, id| p.id = id);
    builder.property("name", |p: &Person| &p.name).unwrap();

    let error = builder.build().unwrap_err();
    assert_eq!(
        error.validation_failures,
        vec![ValidationFailure::MissingSetters {
            properties: vec!["name".to_string()],
        }]
    );
}
