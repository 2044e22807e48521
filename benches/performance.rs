//! Performance benchmarks for the environment gate
//!
//! Validation runs once per process start, so these mostly guard against
//! accidental quadratic behavior as schemas grow.

use clap::Parser;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use records_env::{
    cli::Cli,
    config::{ConfigParser, ConfigValidator, EnvSchema, EnvSnapshot, FieldRule, PlatformPolicy, ValueRule},
    output::OutputFormatterFactory,
    vars, DeploymentMode,
};
use std::hint::black_box;

/// Complete production environment for the records app
fn create_benchmark_env() -> EnvSnapshot {
    EnvSnapshot::new()
        .with(vars::DATABASE_URL, "postgres://records:pw@db.internal:5432/records")
        .with(vars::NODE_ENV, "production")
        .with(vars::NEXTAUTH_SECRET, "session-secret")
        .with(vars::NEXTAUTH_URL, "https://records.example.com")
        .with(vars::GOOGLE_CLIENT_ID, "client-id")
        .with(vars::GOOGLE_CLIENT_SECRET, "client-secret")
        .with(vars::JWT_SECRET, "jwt-secret")
}

/// Records schema padded with `extra` client fields, all set in the env
fn create_wide_schema(extra: usize) -> (EnvSchema, EnvSnapshot) {
    let mut schema = EnvSchema::records_app();
    let mut env = create_benchmark_env();

    for i in 0..extra {
        let name: &'static str = Box::leak(format!("NEXT_PUBLIC_FIELD_{}", i).into_boxed_str());
        schema = schema.with_field(FieldRule::client(name, ValueRule::Url).describe("Benchmark field", "https://x"));
        env = env.with(name, format!("https://cdn{}.example.com", i));
    }

    (schema, env)
}

/// Benchmark the validation pass itself
fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let policy = PlatformPolicy::default();

    group.bench_function("records_app_production", |b| {
        let schema = EnvSchema::records_app();
        let env = create_benchmark_env();
        b.iter(|| {
            let result = ConfigValidator::new(&schema, &policy).validate_all(black_box(&env), DeploymentMode::Production);
            black_box(result)
        });
    });

    group.bench_function("records_app_all_missing", |b| {
        let schema = EnvSchema::records_app();
        let env = EnvSnapshot::new();
        b.iter(|| {
            let result = ConfigValidator::new(&schema, &policy).validate_all(black_box(&env), DeploymentMode::Production);
            black_box(result)
        });
    });

    for extra in [10, 100, 1000] {
        let (schema, env) = create_wide_schema(extra);
        group.bench_with_input(BenchmarkId::new("wide_schema", extra), &env, |b, env| {
            b.iter(|| {
                let result = ConfigValidator::new(&schema, &policy).validate_all(black_box(env), DeploymentMode::Production);
                black_box(result)
            });
        });
    }

    group.finish();
}

/// Benchmark the full startup pipeline from CLI arguments
fn benchmark_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");

    group.bench_function("parse_cli_args", |b| {
        let args = ["records-env", "--no-env-file", "--mode", "production", "--format", "json"];
        b.iter(|| {
            let cli = Cli::try_parse_from(black_box(args)).unwrap();
            black_box(cli)
        });
    });

    group.bench_function("parse_from_cli", |b| {
        let cli = Cli::try_parse_from(["records-env", "--no-env-file"]).unwrap();
        let env = create_benchmark_env();
        b.iter(|| {
            let parser = ConfigParser::with_env(black_box(cli.clone()), env.clone());
            black_box(parser.parse().unwrap())
        });
    });

    group.finish();
}

/// Benchmark report rendering
fn benchmark_reporting(c: &mut Criterion) {
    let mut group = c.benchmark_group("reporting");
    let schema = EnvSchema::records_app();
    let policy = PlatformPolicy::default();
    let failure = ConfigValidator::new(&schema, &policy)
        .validate_all(&EnvSnapshot::new(), DeploymentMode::Production)
        .unwrap_err();

    for (name, cli) in [
        ("text", Cli::try_parse_from(["records-env", "--no-color"]).unwrap()),
        ("json", Cli::try_parse_from(["records-env", "--format", "json"]).unwrap()),
    ] {
        let formatter = OutputFormatterFactory::from_cli(&cli);
        group.bench_function(BenchmarkId::new("failure_report", name), |b| {
            b.iter(|| black_box(formatter.format_failure_report(black_box(&failure)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_validation, benchmark_config_parsing, benchmark_reporting);

criterion_main!(benches);
