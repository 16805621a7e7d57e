//! Directory records as served by the users endpoint, plus the fake
//! accounts offered on the login screen.
//!
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// Coordinates are strings on the wire (`"-37.3159"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

/// Account that can be "logged in" without any credential check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// The fixed set of accounts shown on the login screen.
pub fn fake_accounts() -> Vec<FakeAccount> {
    [
        ("1", "Admin User", "admin@example.com", "Administrator"),
        ("2", "John Doe", "john@example.com", "Manager"),
        ("3", "Bob Johnson", "bob@example.com", "Viewer"),
    ]
    .into_iter()
    .map(|(id, name, email, role)| FakeAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role: role.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    #[test]
    fn decodes_endpoint_record() {
        let user: User = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "Bret");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.address.geo.lng, "81.1496");
    }

    #[test]
    fn fake_accounts_have_unique_ids() {
        let accounts = fake_accounts();
        assert_eq!(accounts.len(), 3);
        let mut ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(accounts[0].role, "Administrator");
    }
}
