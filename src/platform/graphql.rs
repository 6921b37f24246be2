/// A fixed GraphQL document sent to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub query: &'static str,
}

/// Create a user record using a valid identity token
pub const USER_SIGN_UP_WITH_TOKEN: Operation = Operation {
    name: "userSignUpWithToken",
    query: r"mutation($authProfileId: ID!, $email: String!) {
  userSignUpWithToken(authProfileId: $authProfileId, user: { email: $email }) {
    id
  }
}",
};

/// Count users with exactly this email
pub const FIND_USER_BY_EMAIL: Operation = Operation {
    name: "users",
    query: r"query users($email: String) {
  usersList(filter: { email: { equals: $email } }) {
    count
  }
}",
};
