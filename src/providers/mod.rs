pub mod clouddns;
