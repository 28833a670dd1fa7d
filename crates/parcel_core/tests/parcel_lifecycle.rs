use parcel_core::db::open_db_in_memory;
use parcel_core::{Parcel, ParcelRepository, ParcelStatus, SqliteParcelRepository};

#[test]
fn registered_then_sent_parcel_survives_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParcelRepository::try_new(&conn).unwrap();

    let parcel = Parcel::with_created_at(
        1000,
        ParcelStatus::Registered,
        "test",
        "2024-01-01T00:00:00Z",
    );
    let number = repo.add(&parcel).unwrap();

    let fetched = repo.get(number).unwrap();
    assert_eq!(fetched.number, Some(number));
    assert_eq!(fetched.client, 1000);
    assert_eq!(fetched.status, ParcelStatus::Registered);
    assert_eq!(fetched.address, "test");
    assert_eq!(fetched.created_at, "2024-01-01T00:00:00Z");

    repo.set_status(number, &ParcelStatus::Sent).unwrap();
    assert_eq!(repo.get(number).unwrap().status, ParcelStatus::Sent);

    repo.delete(number).unwrap();
    assert!(repo.get(number).is_ok());
}

#[test]
fn parcel_serializes_for_cli_output() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteParcelRepository::try_new(&conn).unwrap();

    let number = repo
        .add(&Parcel::with_created_at(
            3,
            ParcelStatus::Registered,
            "depot",
            "2024-05-06T07:08:09Z",
        ))
        .unwrap();

    let json = serde_json::to_value(repo.get(number).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "number": number,
            "client": 3,
            "status": "registered",
            "address": "depot",
            "created_at": "2024-05-06T07:08:09Z",
        })
    );
}
