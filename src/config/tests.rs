use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        public_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(settings.server.admin_addr.port(), DEFAULT_ADMIN_PORT);
    assert_eq!(
        settings.compile.timeout,
        Duration::from_millis(DEFAULT_COMPILE_TIMEOUT_MS)
    );
    assert_eq!(settings.compile.default_locale, Locale::Id);
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert!(settings.database.url.is_none());
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn compile_overrides_apply() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        compile_timeout_ms: Some(750),
        default_locale: Some("EN".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.compile.timeout, Duration::from_millis(750));
    assert_eq!(settings.compile.default_locale, Locale::En);
}

#[test]
fn unknown_locale_is_rejected() {
    let mut raw = RawSettings::default();
    raw.compile.default_locale = Some("fr".to_string());

    let err = Settings::from_raw(raw).expect_err("locale should be rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "compile.default_locale",
            ..
        }
    ));
}

#[test]
fn zero_compile_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.compile.timeout_ms = Some(0);

    let err = Settings::from_raw(raw).expect_err("timeout should be rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "compile.timeout_ms",
            ..
        }
    ));
}

#[test]
fn zero_pool_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.database.max_connections = Some(0);

    let err = Settings::from_raw(raw).expect_err("pool size should be rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "database.max_connections",
            ..
        }
    ));
}

#[test]
fn listeners_must_not_collide() {
    let mut raw = RawSettings::default();
    raw.server.public_port = Some(4000);
    raw.server.admin_port = Some(4000);

    let err = Settings::from_raw(raw).expect_err("shared address should be rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.admin_port",
            ..
        }
    ));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["undangan"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_recompile_single_slug() {
    let args = CliArgs::parse_from([
        "undangan",
        "recompile",
        "--slug",
        "ayu-bima",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("recompile command") {
        Command::Recompile(recompile) => {
            assert_eq!(recompile.slug.as_deref(), Some("ayu-bima"));
            assert!(!recompile.all);
            assert_eq!(recompile.concurrency, DEFAULT_RECOMPILE_CONCURRENCY);
            assert_eq!(
                recompile.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_recompile_all_with_concurrency() {
    let args = CliArgs::parse_from(["undangan", "recompile", "--all", "--concurrency", "8"]);

    match args.command.expect("recompile command") {
        Command::Recompile(recompile) => {
            assert!(recompile.all);
            assert!(recompile.slug.is_none());
            assert_eq!(recompile.concurrency, 8);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn recompile_requires_a_target() {
    let result = CliArgs::try_parse_from(["undangan", "recompile"]);
    assert!(result.is_err());
}

#[test]
fn recompile_rejects_slug_with_all() {
    let result = CliArgs::try_parse_from(["undangan", "recompile", "--slug", "x", "--all"]);
    assert!(result.is_err());
}

#[test]
fn recompile_override_sets_database_and_timeout() {
    let mut raw = RawSettings::default();
    let args = RecompileArgs {
        database: DatabaseOverride {
            database_url: Some("postgres://override".to_string()),
        },
        slug: None,
        all: true,
        concurrency: 2,
        compile_timeout_ms: Some(1_200),
    };

    raw.apply_recompile_overrides(&args);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.database.url.as_deref(), Some("postgres://override"));
    assert_eq!(settings.compile.timeout, Duration::from_millis(1_200));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["undangan", "migrate", "--database-url", "postgres://m"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(migrate.database.database_url.as_deref(), Some("postgres://m"));
        }
        _ => panic!("wrong command parsed"),
    }
}
