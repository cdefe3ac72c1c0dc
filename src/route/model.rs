/// Client-facing validation messages shared by the resources.
pub mod message {
	pub const NOT_A_STRING: &str = "Not a valid string.";
	pub const NOT_A_FILE: &str =
		"The submitted data was not a file. Check the encoding type on the form.";
	pub const EMPTY_FILE: &str = "The submitted file is empty.";

	pub fn incorrect_pk_type(kind: &str) -> String {
		format!("Incorrect type. Expected pk value, received {kind}.")
	}

	pub fn does_not_exist(pk: &str) -> String {
		format!("Invalid pk \"{pk}\" - object does not exist.")
	}
}
