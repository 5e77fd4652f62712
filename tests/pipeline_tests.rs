//! Integration tests for the file-backed generate and update runs.

use config_forge::config::{PathsSettings, Settings};
use config_forge::pipeline::{Build, Generator, Updater, stored_profiles};
use config_forge::store::{JsonDir, UserConfigStore};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TASKS: &str = "\
# ==================== Alas ====================

Alas:
  - Emulator
  - DropRecord

# ==================== Event ====================

Event:
  - Scheduler
  - Campaign
Raid:
  - Scheduler
  - Campaign
";

const ARGUMENTS: &str = r#"
Emulator:
  Serial: auto
  Server:
    value: cn
    option: [cn, en, jp, tw]
DropRecord:
  AzurStatsID: null
Scheduler:
  Enable: false
  Command: Alas
Campaign:
  Name: "12-4"
  Event:
    value: campaign_main
    option: [campaign_main]
"#;

const OVERRIDES: &str = "\
Raid:
  Campaign:
    Name: raid
";

const GUI: &str = "\
Button:
  Start: Start
";

const EVENTS: &str = "\
| Date     | Directory         | Name | cn       | en          | jp | tw |
|----------|-------------------|------|----------|-------------|----|----|
| 20220127 | raid_001          | -    | 冬季突袭 | Winter Raid | -  | -  |
| 20220224 | event_20220224_cn | -    | 划破海空之翼 | -       | -  | -  |
";

/// Lay out a project in `root` and return settings pointing at it.
fn project(root: &Path) -> Settings {
    let argument_dir = root.join("argument");
    fs::create_dir_all(&argument_dir).unwrap();
    fs::write(argument_dir.join("task.yaml"), TASKS).unwrap();
    fs::write(argument_dir.join("argument.yaml"), ARGUMENTS).unwrap();
    fs::write(argument_dir.join("override.yaml"), OVERRIDES).unwrap();
    fs::write(argument_dir.join("gui.yaml"), GUI).unwrap();
    fs::write(root.join("events.md"), EVENTS).unwrap();

    let mut settings = Settings::default();
    settings.paths = PathsSettings {
        argument_dir,
        config_dir: root.join("config"),
        i18n_dir: root.join("i18n"),
        event_file: root.join("events.md"),
        code_file: root.join("generated.rs"),
    };
    settings
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_generate_writes_every_artifact() {
    let temp = TempDir::new().unwrap();
    let settings = project(temp.path());
    let build = Generator::new(&settings).run().unwrap();
    assert!(build.issues.is_empty());

    let args = read_json(&settings.paths.args_file());
    assert_eq!(args["Raid"]["Campaign"]["Event"]["option"], json!(["raid_001"]));
    assert_eq!(args["Raid"]["Campaign"]["Event"]["en"], json!("Winter Raid"));
    assert_eq!(args["Raid"]["Campaign"]["Name"]["type"], json!("disable"));
    assert_eq!(args["Event"]["Scheduler"]["Command"]["value"], json!("Event"));

    let menu = read_json(&settings.paths.menu_file());
    assert_eq!(menu, json!({"Task": {"Alas": ["Alas"], "Event": ["Event", "Raid"]}}));

    let code = fs::read_to_string(&settings.paths.code_file).unwrap();
    assert!(code.contains("pub const CAMPAIGN_NAME: &str = \"12-4\";"));

    for locale in ["zh-CN", "en-US", "ja-JP", "zh-TW"] {
        let i18n = read_json(&settings.paths.i18n_dir.join(format!("{locale}.json")));
        assert_eq!(i18n["Gui"]["Button"]["Start"], json!("Gui.Button.Start"));
    }
    let en = read_json(&settings.paths.i18n_dir.join("en-US.json"));
    assert_eq!(en["Campaign"]["Event"]["raid_001"], json!("Winter Raid"));
    assert_eq!(en["Campaign"]["Event"]["event_20220224_cn"], json!("划破海空之翼"));

    let template = read_json(&settings.paths.config_dir.join("template.json"));
    assert_eq!(template["Raid"]["Campaign"]["Event"], json!("campaign_main"));
    assert_eq!(template["Alas"]["DropRecord"]["AzurStatsID"], Value::Null);
}

#[test]
fn test_regeneration_is_stable_and_keeps_translations() {
    let temp = TempDir::new().unwrap();
    let settings = project(temp.path());
    Generator::new(&settings).run().unwrap();

    let en_path = settings.paths.i18n_dir.join("en-US.json");
    let mut en = read_json(&en_path);
    en["Campaign"]["Name"]["name"] = json!("Stage");
    fs::write(&en_path, serde_json::to_string_pretty(&en).unwrap()).unwrap();

    let args_before = fs::read(settings.paths.args_file()).unwrap();
    let code_before = fs::read(&settings.paths.code_file).unwrap();
    let template_before = fs::read(settings.paths.config_dir.join("template.json")).unwrap();

    Generator::new(&settings).run().unwrap();
    assert_eq!(fs::read(settings.paths.args_file()).unwrap(), args_before);
    assert_eq!(fs::read(&settings.paths.code_file).unwrap(), code_before);
    assert_eq!(
        fs::read(settings.paths.config_dir.join("template.json")).unwrap(),
        template_before
    );
    assert_eq!(read_json(&en_path)["Campaign"]["Name"]["name"], json!("Stage"));
}

#[test]
fn test_update_named_profiles() {
    let temp = TempDir::new().unwrap();
    let settings = project(temp.path());
    let store = JsonDir::new(&settings.paths.config_dir);
    store
        .write(
            "alas",
            &json!({
                "Alas": {"Emulator": {"Serial": "emulator-5554", "Server": "en"}},
                "Raid": {"Campaign": {"Name": "user stage"}}
            }),
        )
        .unwrap();

    let build = Build::load(&settings.paths, settings.generation.event_order).unwrap();
    let names = stored_profiles(&store).unwrap();
    assert_eq!(names, ["alas", "template"]);

    let updated = Updater::new(&build.schema, true).update_all(&store, &names).unwrap();
    assert_eq!(updated.len(), 2);

    let alas = UserConfigStore::read(&store, "alas").unwrap().unwrap();
    assert_eq!(alas["Alas"]["Emulator"]["Serial"], json!("emulator-5554"));
    assert_eq!(alas["Raid"]["Campaign"]["Event"], json!("raid_001"));
    assert_eq!(alas["Raid"]["Campaign"]["Name"], json!("raid"));
    assert_eq!(alas["Alas"]["DropRecord"]["AzurStatsID"].as_str().map(str::len), Some(32));
}

#[test]
fn test_dry_run_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    let settings = project(temp.path());
    let build = Build::load(&settings.paths, settings.generation.event_order).unwrap();
    let store = JsonDir::new(&settings.paths.config_dir);

    let names = vec!["alas".to_string()];
    let updated = Updater::new(&build.schema, true)
        .dry_run(true)
        .update_all(&store, &names)
        .unwrap();
    assert_eq!(updated[0].1["Alas"]["Emulator"]["Serial"], json!("auto"));
    assert!(!store.path_of("alas").exists());
}

#[test]
fn test_missing_event_calendar_means_no_events() {
    let temp = TempDir::new().unwrap();
    let mut settings = project(temp.path());
    settings.paths.event_file = temp.path().join("absent.md");

    let build = Build::load(&settings.paths, settings.generation.event_order).unwrap();
    assert!(build.events.is_empty());
    let event = build.schema.get("Raid", "Campaign", "Event").unwrap();
    assert_eq!(event.option, Some(vec![]));
}

#[test]
fn test_missing_sources_fail() {
    let temp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.paths.argument_dir = temp.path().join("nowhere");
    assert!(Generator::new(&settings).run().is_err());
}
