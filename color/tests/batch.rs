use {
    color::{
        batch::{self, Cancel, Event, Job, Runner},
        Color,
    },
    im::{Rgb, RgbImage},
    pretty_assertions::assert_eq,
    std::{fs, path::Path},
};

fn palette() -> Vec<Color> {
    color::parse("#000, #fff, #f00").colors
}

fn gradient() -> RgbImage {
    RgbImage::from_fn(24, 16, |x, y| Rgb([(x * 10) as u8, (y * 15) as u8, 40]))
}

fn fill(dir: &Path) {
    im::encode(&gradient(), &dir.join("a.png")).expect("encode png");
    im::encode(&gradient(), &dir.join("b.jpg")).expect("encode jpg");
    fs::write(dir.join("broken.gif"), b"GIF89a but not really").expect("write");
    im::encode(&gradient(), &dir.join("c.bmp")).expect("encode bmp");
    fs::write(dir.join("readme.txt"), b"skipped").expect("write");
}

fn failed_files(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Failed { file, .. } => Some(file.as_str()),
            _ => None,
        })
        .collect()
}

fn progress(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[test]
fn directory_with_corrupt_file() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    fill(input.path());

    let job = Job {
        input: input.path().to_owned(),
        outdir: output.path().join("nested"),
        palette: palette(),
    };

    let mut events = vec![];
    let report = batch::run(&job, &Cancel::new(), |event| events.push(event)).expect("run");

    assert_eq!(report.total, 4);
    assert_eq!(report.processed.len(), 3);
    assert!(!report.cancelled);
    assert_eq!(failed_files(&events), ["broken.gif"]);
    assert_eq!(progress(&events), [25, 50, 75, 100]);
    assert_eq!(events.last(), Some(&Event::Finished(report.clone())));

    let kinds: Vec<_> = events
        .iter()
        .map(|event| match event {
            Event::Processed { file, .. } => format!("ok {file}"),
            Event::Failed { file, .. } => format!("err {file}"),
            Event::Progress(p) => format!("{p}%"),
            Event::Finished(_) => "done".to_owned(),
        })
        .collect();

    assert_eq!(
        kinds,
        [
            "ok a.png",
            "25%",
            "ok b.jpg",
            "50%",
            "err broken.gif",
            "75%",
            "ok c.bmp",
            "100%",
            "done",
        ]
    );

    for name in ["simplified_a.png", "simplified_b.jpg", "simplified_c.bmp"] {
        assert!(job.outdir.join(name).is_file(), "{name} is missing");
    }

    assert!(!job.outdir.join("simplified_broken.gif").exists());

    let repainted = im::decode(&job.outdir.join("simplified_a.png")).expect("decode");
    assert_eq!(repainted.dimensions(), (24, 16));
    let colors = palette();
    assert!(repainted
        .pixels()
        .all(|&px| colors.contains(&Color::from(px))));
}

#[test]
fn single_file() {
    let input = tempfile::tempdir().expect("tempdir");
    let path = input.path().join("photo.png");
    im::encode(&gradient(), &path).expect("encode");

    let job = Job {
        input: path,
        outdir: input.path().to_owned(),
        palette: palette(),
    };

    let mut events = vec![];
    let report = batch::run(&job, &Cancel::new(), |event| events.push(event)).expect("run");
    assert_eq!(report.total, 1);
    assert_eq!(report.processed, [input.path().join("simplified_photo.png")]);
    assert_eq!(progress(&events), [100]);
}

#[test]
fn empty_directory() {
    let input = tempfile::tempdir().expect("tempdir");
    let job = Job {
        input: input.path().to_owned(),
        outdir: input.path().join("out"),
        palette: palette(),
    };

    let mut events = vec![];
    let report = batch::run(&job, &Cancel::new(), |event| events.push(event)).expect("run");
    assert_eq!(report.total, 0);
    assert_eq!(events, [Event::Finished(report)]);
}

#[test]
fn cancel_between_files() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    fill(input.path());

    let job = Job {
        input: input.path().to_owned(),
        outdir: output.path().to_owned(),
        palette: palette(),
    };

    let cancel = Cancel::new();
    let mut events = vec![];
    let report = batch::run(&job, &cancel, |event| {
        if matches!(event, Event::Processed { .. }) {
            cancel.cancel();
        }

        events.push(event);
    })
    .expect("run");

    assert!(report.cancelled);
    assert_eq!(report.processed, [output.path().join("simplified_a.png")]);
    assert_eq!(progress(&events), [25]);
    assert!(!output.path().join("simplified_b.jpg").exists());
}

#[test]
fn background_batch() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    fill(input.path());

    let mut runner = Runner::new();
    let handle = runner
        .start(Job {
            input: input.path().to_owned(),
            outdir: output.path().to_owned(),
            palette: palette(),
        })
        .expect("start");

    let events: Vec<_> = handle.events().iter().collect();
    assert_eq!(progress(&events), [25, 50, 75, 100]);
    assert_eq!(failed_files(&events), ["broken.gif"]);

    let report = runner.finish().expect("active").expect("report");
    assert_eq!(report.processed.len(), 3);
    assert_eq!(events.last(), Some(&Event::Finished(report)));
}

#[test]
fn cancel_background_batch() {
    let input = tempfile::tempdir().expect("tempdir");
    let output = tempfile::tempdir().expect("tempdir");
    let large = RgbImage::from_fn(256, 256, |x, y| Rgb([x as u8, y as u8, 90]));
    for idx in 0..20 {
        im::encode(&large, &input.path().join(format!("{idx:02}.png"))).expect("encode");
    }

    let handle = batch::spawn(Job {
        input: input.path().to_owned(),
        outdir: output.path().to_owned(),
        palette: palette(),
    })
    .expect("spawn");

    handle.cancel();
    let events: Vec<_> = handle.events().iter().collect();
    let report = handle.join().expect("report");

    assert!(report.cancelled);
    assert_eq!(report.total, 20);
    assert!(report.processed.len() + report.failed.len() < 20);
    assert_eq!(
        progress(&events).len(),
        report.processed.len() + report.failed.len(),
    );
    assert_eq!(events.last(), Some(&Event::Finished(report)));
}
