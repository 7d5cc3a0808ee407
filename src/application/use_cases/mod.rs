/// Use cases module containing application business logic orchestration
mod convert_bom;

pub use convert_bom::ConvertBomUseCase;
