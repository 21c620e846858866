//! End-to-end questionnaire scenarios through the public service facade, writing the real CSV
//! application log.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use coffee_hire::workflows::hiring::intake::{
    AdminNotice, AdminNotifier, CandidateId, CsvApplicationLog, IntakePolicy, IntakeService,
    NotifyError, LOG_HEADER,
};
use coffee_hire::workflows::hiring::{FaqBook, VacancyCatalog};

const SHEET: &str = "Город,День,Ночь,Кофейня,Адрес\n\
Владивосток,2,0,Kofemashina,Svetlanskaya 1\n\
Владивосток,1,0,Kofemashina Express,Aleutskaya 12\n\
Артём,0,1,Kofemashina,Kirova 5\n";

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<AdminNotice>>,
}

impl AdminNotifier for RecordingNotifier {
    fn notify(&self, notice: AdminNotice) -> Result<(), NotifyError> {
        self.notices.lock().expect("notifier mutex poisoned").push(notice);
        Ok(())
    }
}

fn service(
    log_path: &std::path::Path,
) -> (
    IntakeService<CsvApplicationLog, RecordingNotifier>,
    Arc<RecordingNotifier>,
) {
    let catalog = Arc::new(VacancyCatalog::from_reader(Cursor::new(SHEET)).expect("sheet parses"));
    let notifier = Arc::new(RecordingNotifier::default());
    let service = IntakeService::new(
        catalog,
        Arc::new(FaqBook::default()),
        Arc::new(CsvApplicationLog::new(log_path)),
        notifier.clone(),
        IntakePolicy::default(),
    );
    (service, notifier)
}

fn read_rows(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).expect("log readable");
    let headers = reader.headers().expect("header row").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), LOG_HEADER.to_vec());
    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("rows parse")
}

#[test]
fn accepted_candidate_is_written_to_the_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("applications_log.csv");
    let (service, notifier) = service(&log_path);
    let candidate = CandidateId::new("1001");

    service.handle_message(&candidate, "/start");
    service.handle_message(&candidate, "Ivan Petrov");
    service.handle_message(&candidate, "20");
    service.handle_message(&candidate, "+79001234567");
    service.handle_message(&candidate, "ВЛАДИВОСТОК");
    let offers = service.handle_message(&candidate, "Дневные");
    assert_eq!(
        offers[0].choices,
        vec![
            "Kofemashina — Svetlanskaya 1".to_string(),
            "Kofemashina Express — Aleutskaya 12".to_string()
        ]
    );
    service.handle_message(&candidate, "Kofemashina Express — Aleutskaya 12");

    let rows = read_rows(&log_path);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(&row[1], "Ivan Petrov");
    assert_eq!(&row[4], "ВЛАДИВОСТОК");
    assert_eq!(&row[5], "day");
    assert_eq!(&row[7], "Kofemashina Express — Aleutskaya 12");
    assert_eq!(&row[8], "ACCEPTED");
    assert_eq!(row[0].len(), "2025-10-01 09:30".len());

    let notices = notifier.notices.lock().expect("notifier mutex poisoned");
    assert_eq!(notices.len(), 1);
    assert!(notices[0].text.contains("Cafe: Kofemashina Express — Aleutskaya 12"));
}

#[test]
fn suggested_cities_match_the_russian_sheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, _) = service(&dir.path().join("applications_log.csv"));

    for (identity, pick, shift, shops) in [("2001", 0, "Day", 2), ("2002", 1, "Night", 1)] {
        let candidate = CandidateId::new(identity);
        service.handle_message(&candidate, "/start");
        service.handle_message(&candidate, "Anna");
        service.handle_message(&candidate, "22");
        let city_prompt = service.handle_message(&candidate, "+79001234567");
        let city = city_prompt[0].choices[pick].clone();

        service.handle_message(&candidate, &city);
        let offers = service.handle_message(&candidate, shift);
        assert_eq!(offers[0].choices.len(), shops, "{city} {shift}");
        assert!(service.session_view(&candidate).is_some(), "{city} awaits a cafe");
    }
}

#[test]
fn every_terminal_outcome_appends_one_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log_path = dir.path().join("applications_log.csv");
    let (service, _) = service(&log_path);

    let scripts: [(&str, &[&str]); 3] = [
        ("young", &["/start", "Petya", "17"]),
        ("nomatch", &["/start", "Olga", "25", "+7900", "Artem", "day"]),
        (
            "partial",
            &["/start", "Max", "30", "+7901", "Владивосток", "Неполные дневные", "9-16"],
        ),
    ];
    for (identity, messages) in scripts {
        let candidate = CandidateId::new(identity);
        for message in messages {
            service.handle_message(&candidate, message);
        }
        assert!(
            service.session_view(&candidate).is_none(),
            "{identity} finished"
        );
    }

    let rows = read_rows(&log_path);
    let statuses: Vec<&str> = rows.iter().map(|row| &row[8]).collect();
    assert_eq!(statuses, vec!["REJECTED", "NO_MATCH", "NO_MATCH_PARTIAL"]);
    assert_eq!(&rows[0][3], "-", "phone never collected");
    assert_eq!(&rows[0][9], "underage");
    assert_eq!(&rows[2][6], "09:00-16:00");
}
