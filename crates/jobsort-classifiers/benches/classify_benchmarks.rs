//! Classification throughput benchmarks
//!
//! Measures normalization, exact keyword counting and the per-document
//! TF-IDF fit over a realistic keyword table.
//!
//! Run with: cargo bench -p jobsort-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use jobsort_classifiers::{
    Classifier, IdentityLemmatizer, KeywordTable, Normalizer, PipelineConfig, Stopwords, Strategy,
};

const STOPWORDS: &str = include_str!("../tests/fixtures/french_stopwords.txt");

const SHORT_OFFER: &str = "Nous recherchons un stagiaire développeur logiciel pour 6 mois";

const LONG_OFFER: &str = "Offre d'alternance : ingénieur génie civil H/F. Au sein de notre \
    bureau d'études, vous participerez au suivi des chantiers de travaux publics, à la \
    conception des ouvrages d'art et au dimensionnement des structures en béton armé. \
    Profil : étudiant en école d'ingénieurs ou master génie civil, maîtrise d'AutoCAD et \
    de Revit, goût du terrain. Rythme : trois semaines en entreprise, une semaine à l'école.";

fn normalizer() -> Normalizer {
    Normalizer::new(Stopwords::parse(STOPWORDS), Box::new(IdentityLemmatizer))
        .expect("Failed to build normalizer")
}

fn majors(normalizer: &Normalizer) -> KeywordTable {
    let rows = [
        ("Informatique", "développeur"),
        ("Informatique", "logiciel"),
        ("Informatique", "programmation"),
        ("Informatique", "réseau"),
        ("Informatique", "base de données"),
        ("Génie Civil", "génie civil"),
        ("Génie Civil", "chantier"),
        ("Génie Civil", "travaux publics"),
        ("Génie Civil", "béton armé"),
        ("Génie Civil", "bureau d'études"),
        ("Droit", "avocat"),
        ("Droit", "juridique"),
        ("Droit", "contentieux"),
        ("Commerce", "commercial"),
        ("Commerce", "vente"),
        ("Commerce", "négociation"),
        ("Finance", "audit"),
        ("Finance", "comptabilité"),
        ("Finance", "contrôle de gestion"),
    ];
    KeywordTable::from_rows(rows, normalizer)
}

/// Benchmark text normalization
fn benchmark_normalizer(c: &mut Criterion) {
    let normalizer = normalizer();

    let mut group = c.benchmark_group("Normalizer");
    for (name, text) in [("short", SHORT_OFFER), ("long", LONG_OFFER)] {
        group.bench_with_input(BenchmarkId::new("normalize", name), &text, |b, text| {
            b.iter(|| normalizer.normalize(black_box(text)))
        });
    }
    group.finish();
}

/// Benchmark both scoring strategies on pre-normalized documents
fn benchmark_strategies(c: &mut Criterion) {
    let normalizer = normalizer();
    let config = PipelineConfig::default();
    let table = majors(&normalizer);

    let contract = Strategy::ExactMatch
        .build("contract_type", &KeywordTable::contract_types(), &config)
        .expect("Failed to build contract classifier");
    let major = Strategy::tfidf(&config)
        .build("major", &table, &config)
        .expect("Failed to build major classifier");

    let mut group = c.benchmark_group("Strategies");
    group.sample_size(100);

    for (name, text) in [("short", SHORT_OFFER), ("long", LONG_OFFER)] {
        let doc = normalizer.normalize(text);
        group.bench_with_input(BenchmarkId::new("exact_match", name), &doc, |b, doc| {
            b.iter(|| contract.classify(black_box(doc)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("tfidf", name), &doc, |b, doc| {
            b.iter(|| major.classify(black_box(doc)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_normalizer, benchmark_strategies);
criterion_main!(benches);
