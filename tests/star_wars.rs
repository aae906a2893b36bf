extern crate fabrix_editor;

use fabrix_editor::language::parse;
use fabrix_editor::types::definition::*;
use fabrix_editor::types::{build_ast_schema, fabrix, merge_schemas, print_schema, validate};

/*
 * The type system for our Star Wars example, as SDL.
 */
const STAR_WARS: &str = r#"
"One of the films in the Star Wars Trilogy"
enum Episode {
  "Released in 1977."
  NEWHOPE
  "Released in 1980."
  EMPIRE
  "Released in 1983."
  JEDI
}

"A character in the Star Wars Trilogy"
interface Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
}

"A humanoid creature in the Star Wars universe."
type Human implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  homePlanet: String
}

"A mechanical creature in the Star Wars universe."
type Droid implements Character {
  id: String!
  name: String
  friends: [Character]
  appearsIn: [Episode]
  primaryFunction: String
}

type Query {
  hero(episode: Episode): Character
  human(id: String!): Human
  droid(id: String!): Droid
}
"#;

fn setup_schema() -> Schema {
    build_ast_schema(&parse(STAR_WARS).unwrap()).unwrap()
}

#[test]
fn create_star_wars_schema() {
    let schema = setup_schema();

    assert_eq!(schema.query_type.as_deref(), Some("Query"));
    match schema.get_type("Episode") {
        Some(TypeDefinition::Enum(episode)) => {
            assert_eq!(episode.description.as_deref(), Some("One of the films in the Star Wars Trilogy"));
            assert_eq!(episode.values.len(), 3);
            assert_eq!(episode.values[0].description.as_deref(), Some("Released in 1977."));
        }
        other => panic!("unexpected type {:?}", other),
    }
    match schema.get_type("Droid") {
        Some(TypeDefinition::Object(droid)) => assert_eq!(droid.interfaces, vec!["Character".to_string()]),
        other => panic!("unexpected type {:?}", other),
    }
    let hero = schema.get_type("Query").and_then(|q| q.field("hero")).unwrap();
    assert_eq!(hero.field_type, TypeRef::named("Character"));
    assert_eq!(hero.arguments[0].value_type.to_string(), "Episode");
}

#[test]
fn star_wars_queries_validate() {
    let schema = setup_schema();
    let query = parse(
        r#"
        query HeroNameAndFriends($episode: Episode) {
          hero(episode: $episode) {
            name
            friends { name }
            ... on Droid { primaryFunction }
          }
        }
        "#,
    )
    .unwrap();

    assert!(validate(&schema, &query).is_empty());
}

#[test]
fn star_wars_mistakes_are_reported() {
    let schema = setup_schema();
    let query = parse("{ hero { name homePlanet } droid(id: \"2001\") }").unwrap();
    let messages = validate(&schema, &query)
        .into_iter()
        .map(|error| error.message)
        .collect::<Vec<_>>();

    assert_eq!(
        messages,
        vec![
            "Cannot query field \"homePlanet\" on type \"Character\".".to_string(),
            "Field \"droid\" of type \"Droid\" must have a selection of subfields. Did you mean \"droid { ... }\"?"
                .to_string(),
        ]
    );
}

#[test]
fn star_wars_schema_prints_and_rebuilds() {
    let schema = setup_schema();
    let printed = print_schema(&schema);
    assert!(printed.starts_with("\"\"\"A character in the Star Wars Trilogy\"\"\"\ninterface Character {"));

    let rebuilt = build_ast_schema(&parse(&printed).unwrap()).unwrap();
    assert_eq!(schema, rebuilt);
}

#[test]
fn star_wars_schema_takes_the_view_directives() {
    let schema = setup_schema();
    let merged = merge_schemas(&[&schema, &fabrix::schema_definition().unwrap()]).unwrap();

    assert!(merged.directive("fabrixView").is_some());
    assert!(merged.get_type("Droid").is_some());

    let query = parse(
        r#"{ hero @fabrixView(input: [{ field: "name", config: { label: "Name" } }]) { name } }"#,
    )
    .unwrap();
    assert!(validate(&merged, &query).is_empty());
    assert_eq!(validate(&schema, &query).len(), 1);
}
