/// Unique example identifier within a split (stable across runs).
/// Examples: `0`, `42`, `--7E2sU6zP4-5`
pub type ExampleId = String;
/// Registered dataset name.
/// Examples: `asl_citizen`, `how2sign`
pub type DatasetName = String;
/// Feature (field) name inside an example record.
/// Examples: `id`, `signer_id`, `pose`
pub type FieldName = String;
/// Clip identifier with any container suffix removed.
/// Example: `5983320426555474-LICENSE`
pub type ClipId = String;
/// Remote location of an archive or file.
/// Example: `https://download.microsoft.com/.../ASL_Citizen.zip`
pub type RemoteUrl = String;
