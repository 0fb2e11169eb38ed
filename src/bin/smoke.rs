use std::path::PathBuf;

use indexmap::IndexMap;

use ndb::common::delete_all_files_by_glob;
use ndb::common::Error;
use ndb::database::*;
use ndb::schema::*;
use ndb::table::*;
use ndb::value::*;

fn main() -> Result<(), Error> {
    env_logger::init();

    let base = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::new())
        .join("db");
    let config = DatabaseConfig::under(base, "smoke");
    delete_all_files_by_glob(&format!("{}/*.ndb", config.dir.display()));

    let users = Table::new(vec![
        Column::Text(ColumnDef::new("email").required().unique()),
        Column::Number(ColumnDef::new("age").with_default(18.0)),
        Column::Json(ColumnDef::new("tags")),
    ])?;

    let mut db = Database::new(config.clone(), IndexMap::from([("users".to_string(), users)]))?;

    let users = db.table_mut("users")?;
    let ann = users.insert(Values::from([
        ("email".to_string(), Value::from("ann@example.com")),
        ("tags".to_string(), Value::List(vec!["admin".into()])),
    ]))?;
    users.insert(Values::from([
        ("email".to_string(), Value::from("bob@example.com")),
        ("age".to_string(), Value::from(33)),
    ]))?;

    let duplicate = Values::from([("email".to_string(), Value::from("ann@example.com"))]);
    if let Err(err) = users.insert(duplicate) {
        println!("Rejected duplicate: {err}");
    }

    users.update(&ann.id, Values::from([("age".to_string(), Value::from(41))]))?;
    db.save()?;

    let empty = Table::new(db.table("users")?.columns().to_vec())?;
    let mut reloaded = Database::new(config, IndexMap::from([("users".to_string(), empty)]))?;
    reloaded.load()?;

    let rows = reloaded.table("users")?.select();
    dbg!(rows);

    Ok(())
}
