use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use release_watch::feed::filter::PlatformFilter;
use release_watch::feed::parser::FeedParser;
use release_watch::storage::novel;
use release_watch::Entry;
use std::io::Cursor;

const DISTROS: [&str; 8] = ["Ubuntu", "Fedora", "Arch", "Debian", "CentOS", "Gentoo", "openSUSE", "RHEL"];

fn make_entries(count: usize) -> Vec<Entry> {
    (0..count)
        .map(|i| {
            let distro = DISTROS[i % DISTROS.len()];
            Entry::new(
                format!("{} {}.{} released", distro, i / 12, i % 12),
                format!("https://distrowatch.com/?newsid={}", i),
                format!("Release notes for {} build {}", distro, i),
            )
        })
        .collect()
}

fn make_feed(count: usize) -> String {
    let mut feed = String::from("<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>Bench</title>");
    for entry in make_entries(count) {
        feed.push_str(&format!(
            "<item><title>{}</title><link>{}</link><description>{}</description></item>",
            entry.title, entry.link, entry.summary
        ));
    }
    feed.push_str("</channel></rss>");
    feed
}

fn bench_platform_filter(c: &mut Criterion) {
    let filter = PlatformFilter::new(&["centos", "red hat", "rhel", "oel", "ubuntu", "suse", "arch"]).unwrap();

    let mut group = c.benchmark_group("platform_filter");
    for &count in &[10usize, 100, 1000] {
        let entries = make_entries(count);
        group.bench_with_input(BenchmarkId::new("filter", count), &entries, |b, entries| {
            b.iter(|| black_box(filter.filter(entries.clone())));
        });
    }
    group.finish();
}

fn bench_novel_subset(c: &mut Criterion) {
    let mut group = c.benchmark_group("novel_subset");
    for &stored_count in &[100usize, 1000, 10000] {
        let stored = make_entries(stored_count);
        // Half already known, half new
        let incoming = make_entries(stored_count + 50)[stored_count - 50..].to_vec();
        group.bench_with_input(
            BenchmarkId::new("novel", stored_count),
            &(stored, incoming),
            |b, (stored, incoming)| {
                b.iter(|| black_box(novel(stored, incoming)));
            },
        );
    }
    group.finish();
}

fn bench_parse_feed(c: &mut Criterion) {
    let parser = FeedParser::new();
    let feed = make_feed(500);

    c.bench_function("parse_distro_feed_500", |b| {
        b.iter(|| black_box(parser.parse_feed(Cursor::new(feed.as_bytes()))))
    });
}

criterion_group!(benches, bench_platform_filter, bench_novel_subset, bench_parse_feed);
criterion_main!(benches);
